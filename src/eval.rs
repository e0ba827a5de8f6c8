//! Tree-walking evaluator: runtime values, lexical environments and the
//! statement/expression walker.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::io;
use std::io::prelude::*;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ast::{Expr, Stmt};
use crate::ctx::Context;
use crate::interner::Symbol;

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Nil,
    Number(f32),
    Str(Rc<str>),
    Bool(bool),
    Function(Function),
}

impl Value {
    /// Only `nil` and `false` are falsy; `0` and `""` are truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Language-level equality: values of different kinds are never equal,
    /// numbers compare by bit pattern, strings by content.
    fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Number(l), Value::Number(r)) => l.to_bits() == r.to_bits(),
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Function(l), Value::Function(r)) => l == r,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Function(func) => write!(f, "function {}/{}", func.name, func.arity),
        }
    }
}

/// A callable value: a user function or a native one.
#[derive(Clone)]
pub struct Function {
    name: Symbol,
    arity: usize,
    body: FunctionBody,
}

#[derive(Clone)]
enum FunctionBody {
    Builtin(fn(&[Value]) -> Result<Value, RuntimeError>),
    User {
        params: Vec<Symbol>,
        body: Rc<Stmt>,
        /// Environment active at the declaration site, so calls see the
        /// lexical scope the function closed over.
        closure: Rc<Env>,
    },
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Function {}

/// Result of executing one statement.  A `Return` travels up through
/// blocks and loops until a call frame (or the top level) absorbs it.
#[derive(Debug)]
enum Flow {
    Normal,
    Return(Value),
}

#[derive(Debug)]
pub enum RuntimeError {
    TypeMismatch(&'static str),
    UnknownVar(String),
    RedefinedVar(String),
    NotCallable,
    BadArity {
        callee: String,
        expected: usize,
        found: usize,
    },
    Io(io::Error),
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::Io(e) => Some(e),
            RuntimeError::TypeMismatch(_)
            | RuntimeError::UnknownVar(_)
            | RuntimeError::RedefinedVar(_)
            | RuntimeError::NotCallable
            | RuntimeError::BadArity { .. } => None,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::TypeMismatch(op) => {
                write!(f, "invalid operand types for '{}'", op)
            }
            RuntimeError::UnknownVar(name) => write!(f, "undefined variable \"{}\"", name),
            RuntimeError::RedefinedVar(name) => write!(f, "variable \"{}\" redeclared", name),
            RuntimeError::NotCallable => {
                write!(f, "expression does not result in callable value")
            }
            RuntimeError::BadArity {
                callee,
                expected,
                found,
            } => write!(
                f,
                "function \"{}\" expects {} arguments, got {}",
                callee, expected, found
            ),
            RuntimeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> RuntimeError {
        RuntimeError::Io(e)
    }
}

/// Walks a program against a chain of lexical environments, writing
/// `print` output to `output`.
#[derive(Debug)]
pub struct Evaluator<'t, W: Write> {
    output: &'t mut W,
    globals: Rc<Env>,
}

impl<'a, W: Write> Evaluator<'a, W> {
    pub fn new(output: &'a mut W, ctx: Rc<Context>) -> Evaluator<'a, W> {
        let globals = Env::new();
        globals.add_builtin(&ctx.symbol("clock"), 0, builtin_clock);
        globals.add_builtin(&ctx.symbol("sqrt"), 1, builtin_sqrt);
        Evaluator { output, globals }
    }

    /// Executes a whole program in the global environment.  A `return` at
    /// the top level simply ends execution.
    pub fn eval_program(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        self.eval_stmts(stmts, self.globals.clone())?;
        Ok(())
    }

    fn eval_stmts(&mut self, stmts: &[Stmt], env: Rc<Env>) -> Result<Flow, RuntimeError> {
        for stmt in stmts {
            if let Flow::Return(v) = self.eval_stmt(stmt, env.clone())? {
                return Ok(Flow::Return(v));
            }
        }
        Ok(Flow::Normal)
    }

    fn eval_stmt(&mut self, stmt: &Stmt, env: Rc<Env>) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Nop => (),
            Stmt::Expr(e) => {
                self.eval_expr(e, env)?;
            }
            Stmt::Print(e) => {
                let v = self.eval_expr(e, env)?;
                writeln!(self.output, "{}", v)?;
            }
            Stmt::VarDecl(name, init) => {
                let v = self.eval_expr(init, env.clone())?;
                env.define(name, v)?;
            }
            Stmt::FunDecl(name, params, body) => {
                let func = Function {
                    name: name.clone(),
                    arity: params.len(),
                    body: FunctionBody::User {
                        params: params.clone(),
                        body: body.clone(),
                        closure: env.clone(),
                    },
                };
                env.define(name, Value::Function(func))?;
            }
            Stmt::Block(stmts) => {
                return self.eval_stmts(stmts, Env::with_parent(Some(env)));
            }
            Stmt::If(cond, then_branch, else_branch) => {
                if self.eval_expr(cond, env.clone())?.is_truthy() {
                    return self.eval_stmt(then_branch, env);
                } else if let Some(else_branch) = else_branch {
                    return self.eval_stmt(else_branch, env);
                }
            }
            Stmt::While(cond, body) => {
                let scope = Env::with_parent(Some(env));
                while self.eval_expr(cond, scope.clone())?.is_truthy() {
                    if let Flow::Return(v) = self.eval_stmt(body, scope.clone())? {
                        return Ok(Flow::Return(v));
                    }
                }
            }
            Stmt::Return(e) => {
                return Ok(Flow::Return(self.eval_expr(e, env)?));
            }
        };
        Ok(Flow::Normal)
    }

    fn eval_expr(&mut self, expr: &Expr, env: Rc<Env>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Nil => Ok(Value::Nil),
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Var(name) => match env.lookup(name) {
                Some(v) => Ok(v),
                None => Err(RuntimeError::UnknownVar(name.name().to_owned())),
            },
            Expr::Not(e) => {
                let v = self.eval_expr(e, env)?;
                Ok(Value::Bool(!v.is_truthy()))
            }
            Expr::UnaryMinus(e) => {
                if let Value::Number(n) = self.eval_expr(e, env)? {
                    Ok(Value::Number(-n))
                } else {
                    Err(RuntimeError::TypeMismatch("-"))
                }
            }
            Expr::Add(lhs, rhs) => {
                let l = self.eval_expr(lhs, env.clone())?;
                let r = self.eval_expr(rhs, env)?;
                match (l, r) {
                    (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                    (Value::Str(l), Value::Str(r)) => {
                        let mut s = String::with_capacity(l.len() + r.len());
                        s.push_str(&l);
                        s.push_str(&r);
                        Ok(Value::Str(Rc::from(s)))
                    }
                    _ => Err(RuntimeError::TypeMismatch("+")),
                }
            }
            Expr::Sub(lhs, rhs) => {
                let (l, r) = self.number_operands(lhs, rhs, env, "-")?;
                Ok(Value::Number(l - r))
            }
            Expr::Mul(lhs, rhs) => {
                let (l, r) = self.number_operands(lhs, rhs, env, "*")?;
                Ok(Value::Number(l * r))
            }
            Expr::Div(lhs, rhs) => {
                // IEEE-754 semantics: dividing by zero yields an infinity
                // or NaN, not an error.
                let (l, r) = self.number_operands(lhs, rhs, env, "/")?;
                Ok(Value::Number(l / r))
            }
            Expr::Less(lhs, rhs) => {
                let (l, r) = self.number_operands(lhs, rhs, env, "<")?;
                Ok(Value::Bool(l < r))
            }
            Expr::LessEqual(lhs, rhs) => {
                let (l, r) = self.number_operands(lhs, rhs, env, "<=")?;
                Ok(Value::Bool(l <= r))
            }
            Expr::Greater(lhs, rhs) => {
                let (l, r) = self.number_operands(lhs, rhs, env, ">")?;
                Ok(Value::Bool(l > r))
            }
            Expr::GreaterEqual(lhs, rhs) => {
                let (l, r) = self.number_operands(lhs, rhs, env, ">=")?;
                Ok(Value::Bool(l >= r))
            }
            Expr::Equal(lhs, rhs) => {
                let l = self.eval_expr(lhs, env.clone())?;
                let r = self.eval_expr(rhs, env)?;
                Ok(Value::Bool(l.equals(&r)))
            }
            Expr::NotEqual(lhs, rhs) => {
                let l = self.eval_expr(lhs, env.clone())?;
                let r = self.eval_expr(rhs, env)?;
                Ok(Value::Bool(!l.equals(&r)))
            }
            Expr::Or(lhs, rhs) => {
                let l = self.eval_expr(lhs, env.clone())?;
                if l.is_truthy() {
                    return Ok(l);
                }
                let r = self.eval_expr(rhs, env)?;
                if r.is_truthy() {
                    Ok(r)
                } else {
                    Ok(Value::Bool(false))
                }
            }
            Expr::And(lhs, rhs) => {
                if !self.eval_expr(lhs, env.clone())?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                let r = self.eval_expr(rhs, env)?;
                Ok(Value::Bool(r.is_truthy()))
            }
            Expr::Group(e) => self.eval_expr(e, env),
            Expr::Assign(name, rhs) => {
                let v = self.eval_expr(rhs, env.clone())?;
                env.assign(name, v.clone())?;
                Ok(v)
            }
            Expr::Call(callee, args) => {
                let c = self.eval_expr(callee, env.clone())?;
                let mut evaluated = Vec::with_capacity(args.len());
                for a in args {
                    evaluated.push(self.eval_expr(a, env.clone())?);
                }
                match c {
                    Value::Function(f) => self.call_function(f, evaluated),
                    _ => Err(RuntimeError::NotCallable),
                }
            }
        }
    }

    fn call_function(
        &mut self,
        func: Function,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        if args.len() != func.arity {
            return Err(RuntimeError::BadArity {
                callee: func.name.name().to_owned(),
                expected: func.arity,
                found: args.len(),
            });
        }
        match func.body {
            FunctionBody::Builtin(native) => (native)(&args),
            FunctionBody::User {
                params,
                body,
                closure,
            } => {
                // Parameters live in a frame parented at the captured
                // declaration-site environment, not the caller's.
                let frame = Env::with_parent(Some(closure));
                for (param, arg) in params.iter().zip(args.into_iter()) {
                    frame.define(param, arg)?;
                }
                match self.eval_stmt(&body, frame)? {
                    Flow::Return(v) => Ok(v),
                    Flow::Normal => Ok(Value::Nil),
                }
            }
        }
    }

    /// Evaluates both operands and requires numbers, the common case for
    /// arithmetic and ordering operators.
    fn number_operands(
        &mut self,
        lhs: &Expr,
        rhs: &Expr,
        env: Rc<Env>,
        op: &'static str,
    ) -> Result<(f32, f32), RuntimeError> {
        match (
            self.eval_expr(lhs, env.clone())?,
            self.eval_expr(rhs, env)?,
        ) {
            (Value::Number(l), Value::Number(r)) => Ok((l, r)),
            _ => Err(RuntimeError::TypeMismatch(op)),
        }
    }
}

fn builtin_clock(_args: &[Value]) -> Result<Value, RuntimeError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Ok(Value::Number(now.as_secs_f32()))
}

fn builtin_sqrt(args: &[Value]) -> Result<Value, RuntimeError> {
    if let Value::Number(n) = args[0] {
        Ok(Value::Number(n.sqrt()))
    } else {
        Err(RuntimeError::TypeMismatch("sqrt"))
    }
}

/// One lexical scope: a mapping from names to values plus a link to the
/// enclosing scope (`None` at global).
#[derive(Debug)]
struct Env {
    parent: Option<Rc<Env>>,
    bindings: RefCell<HashMap<Symbol, Value>>,
}

impl Env {
    fn new() -> Rc<Env> {
        Self::with_parent(None)
    }

    fn with_parent(parent: Option<Rc<Env>>) -> Rc<Env> {
        Rc::new(Env {
            parent,
            bindings: RefCell::new(HashMap::new()),
        })
    }

    /// Binds `name` in this scope.  Declaring a name twice in the same
    /// scope is an error.
    fn define(&self, name: &Symbol, val: Value) -> Result<(), RuntimeError> {
        if let Entry::Vacant(entry) = self.bindings.borrow_mut().entry(name.clone()) {
            entry.insert(val);
            Ok(())
        } else {
            Err(RuntimeError::RedefinedVar(name.name().to_owned()))
        }
    }

    /// Mutates the innermost scope that defines `name`.
    fn assign(&self, name: &Symbol, val: Value) -> Result<(), RuntimeError> {
        if let Entry::Occupied(mut entry) = self.bindings.borrow_mut().entry(name.clone()) {
            entry.insert(val);
            Ok(())
        } else if let Some(parent) = self.parent.as_ref() {
            parent.assign(name, val)
        } else {
            Err(RuntimeError::UnknownVar(name.name().to_owned()))
        }
    }

    fn lookup(&self, name: &Symbol) -> Option<Value> {
        match self.bindings.borrow().get(name) {
            Some(v) => Some(v.clone()),
            None => self.parent.as_ref().and_then(|p| p.lookup(name)),
        }
    }

    fn add_builtin(
        &self,
        name: &Symbol,
        arity: usize,
        body: fn(&[Value]) -> Result<Value, RuntimeError>,
    ) {
        let func = Function {
            name: name.clone(),
            arity,
            body: FunctionBody::Builtin(body),
        };
        if self.define(name, Value::Function(func)).is_err() {
            unreachable!("builtin {} registered twice", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_expr(expr: &Expr) -> Result<Value, RuntimeError> {
        let mut out: Vec<u8> = Vec::new();
        let ctx = Context::new();
        let mut evaluator = Evaluator::new(&mut out, ctx);
        let globals = evaluator.globals.clone();
        let val = evaluator.eval_expr(expr, globals)?;
        assert!(out.is_empty());
        Ok(val)
    }

    fn eval_prg(prg: &[Stmt]) -> Result<String, RuntimeError> {
        eval_prg_with_ctx(Context::new(), prg)
    }

    fn eval_prg_with_ctx(ctx: Rc<Context>, prg: &[Stmt]) -> Result<String, RuntimeError> {
        let mut out: Vec<u8> = Vec::new();
        let mut e = Evaluator::new(&mut out, ctx);
        e.eval_program(prg)?;
        Ok(String::from_utf8(out).expect("output is not valid UTF-8"))
    }

    fn number(n: f32) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    fn string(s: &str) -> Box<Expr> {
        Box::new(Expr::Str(Rc::from(s)))
    }

    #[test]
    fn literals_evaluate_to_themselves() -> Result<(), RuntimeError> {
        assert_eq!(eval_expr(&Expr::Number(1.0))?, Value::Number(1.0));
        assert_eq!(eval_expr(&Expr::Nil)?, Value::Nil);
        assert_eq!(eval_expr(&Expr::Bool(true))?, Value::Bool(true));
        assert_eq!(eval_expr(&Expr::Str(Rc::from("x")))?, Value::Str(Rc::from("x")));
        Ok(())
    }

    #[test]
    fn arithmetic() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Add(number(1.0), Box::new(Expr::Mul(number(2.0), number(3.0)))))?,
            Value::Number(7.0)
        );
        assert_eq!(
            eval_expr(&Expr::Sub(number(1.0), number(3.0)))?,
            Value::Number(-2.0)
        );
        assert_eq!(
            eval_expr(&Expr::Div(number(6.0), number(2.0)))?,
            Value::Number(3.0)
        );
        Ok(())
    }

    #[test]
    fn division_by_zero_follows_ieee() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Div(number(1.0), number(0.0)))?,
            Value::Number(f32::INFINITY)
        );
        match eval_expr(&Expr::Div(number(0.0), number(0.0)))? {
            Value::Number(n) => assert!(n.is_nan()),
            v => panic!("unexpected value: {:?}", v),
        }
        Ok(())
    }

    #[test]
    fn unary_minus_negates_fresh_value() -> Result<(), RuntimeError> {
        let operand = Expr::Number(1.0);
        assert_eq!(
            eval_expr(&Expr::UnaryMinus(Box::new(operand.clone())))?,
            Value::Number(-1.0)
        );
        // The literal is untouched.
        assert_eq!(operand, Expr::Number(1.0));
        Ok(())
    }

    #[test]
    fn unary_minus_on_bool_is_an_error() {
        match eval_expr(&Expr::UnaryMinus(Box::new(Expr::Bool(true)))) {
            Err(RuntimeError::TypeMismatch("-")) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn not_uses_truthiness() -> Result<(), RuntimeError> {
        assert_eq!(eval_expr(&Expr::Not(Box::new(Expr::Nil)))?, Value::Bool(true));
        assert_eq!(
            eval_expr(&Expr::Not(number(0.0)))?,
            Value::Bool(false),
            "zero is truthy"
        );
        assert_eq!(
            eval_expr(&Expr::Not(string("")))?,
            Value::Bool(false),
            "the empty string is truthy"
        );
        Ok(())
    }

    #[test]
    fn string_concatenation() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Add(string("hi, "), string("world")))?,
            Value::Str(Rc::from("hi, world"))
        );
        Ok(())
    }

    #[test]
    fn adding_number_and_string_is_an_error() {
        match eval_expr(&Expr::Add(number(1.0), string("x"))) {
            Err(RuntimeError::TypeMismatch("+")) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn comparisons() -> Result<(), RuntimeError> {
        assert_eq!(eval_expr(&Expr::Less(number(1.0), number(2.0)))?, Value::Bool(true));
        assert_eq!(
            eval_expr(&Expr::LessEqual(number(2.0), number(2.0)))?,
            Value::Bool(true)
        );
        assert_eq!(
            eval_expr(&Expr::Greater(number(1.0), number(2.0)))?,
            Value::Bool(false)
        );
        assert_eq!(
            eval_expr(&Expr::GreaterEqual(number(1.0), number(2.0)))?,
            Value::Bool(false)
        );
        Ok(())
    }

    #[test]
    fn comparing_strings_is_an_error() {
        match eval_expr(&Expr::Less(string("a"), string("b"))) {
            Err(RuntimeError::TypeMismatch("<")) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn equality_within_one_kind() -> Result<(), RuntimeError> {
        assert_eq!(eval_expr(&Expr::Equal(number(2.0), number(2.0)))?, Value::Bool(true));
        assert_eq!(
            eval_expr(&Expr::Equal(string("a"), string("a")))?,
            Value::Bool(true)
        );
        assert_eq!(
            eval_expr(&Expr::NotEqual(number(6.0), number(2.0)))?,
            Value::Bool(true)
        );
        Ok(())
    }

    #[test]
    fn equality_across_kinds_is_always_false() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Equal(number(1.0), string("1")))?,
            Value::Bool(false)
        );
        assert_eq!(
            eval_expr(&Expr::Equal(Box::new(Expr::Nil), Box::new(Expr::Bool(false))))?,
            Value::Bool(false)
        );
        assert_eq!(
            eval_expr(&Expr::NotEqual(number(1.0), string("1")))?,
            Value::Bool(true)
        );
        Ok(())
    }

    #[test]
    fn or_yields_first_truthy_operand() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Or(number(1.0), number(2.0)))?,
            Value::Number(1.0)
        );
        assert_eq!(
            eval_expr(&Expr::Or(Box::new(Expr::Nil), string("default")))?,
            Value::Str(Rc::from("default"))
        );
        assert_eq!(
            eval_expr(&Expr::Or(Box::new(Expr::Nil), Box::new(Expr::Bool(false))))?,
            Value::Bool(false)
        );
        Ok(())
    }

    #[test]
    fn and_normalizes_to_bool() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::And(number(1.0), number(2.0)))?,
            Value::Bool(true)
        );
        assert_eq!(
            eval_expr(&Expr::And(Box::new(Expr::Nil), number(2.0)))?,
            Value::Bool(false)
        );
        assert_eq!(
            eval_expr(&Expr::And(number(1.0), Box::new(Expr::Nil)))?,
            Value::Bool(false)
        );
        Ok(())
    }

    #[test]
    fn or_short_circuits() -> Result<(), RuntimeError> {
        // The right operand would raise UnknownVar if evaluated.
        let ctx = Context::new();
        assert_eq!(
            eval_expr(&Expr::Or(
                number(1.0),
                Box::new(Expr::Var(ctx.symbol("nope")))
            ))?,
            Value::Number(1.0)
        );
        Ok(())
    }

    #[test]
    fn print_stmt_writes_line() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_prg(&[Stmt::Print(number(42.0))])?,
            "42\n"
        );
        Ok(())
    }

    #[test]
    fn numbers_print_without_trailing_zeros() -> Result<(), RuntimeError> {
        assert_eq!(eval_prg(&[Stmt::Print(number(3.0))])?, "3\n");
        assert_eq!(eval_prg(&[Stmt::Print(number(2.5))])?, "2.5\n");
        Ok(())
    }

    #[test]
    fn set_and_get_var() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        let foo = ctx.symbol("foo");
        assert_eq!(
            eval_prg_with_ctx(
                ctx,
                &[
                    Stmt::VarDecl(foo.clone(), number(42.0)),
                    Stmt::Print(Box::new(Expr::Var(foo)))
                ]
            )?,
            "42\n"
        );
        Ok(())
    }

    #[test]
    fn assign_to_unknown_var() {
        let ctx = Context::new();
        let foo = ctx.symbol("foo");
        match eval_prg_with_ctx(
            ctx,
            &[Stmt::Expr(Box::new(Expr::Assign(foo.clone(), number(42.0))))],
        ) {
            Err(RuntimeError::UnknownVar(name)) if name == foo.name() => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn declare_variable_twice() {
        let ctx = Context::new();
        let foo = ctx.symbol("foo");
        match eval_prg_with_ctx(
            ctx,
            &[
                Stmt::VarDecl(foo.clone(), number(42.0)),
                Stmt::VarDecl(foo.clone(), number(24.0)),
            ],
        ) {
            Err(RuntimeError::RedefinedVar(name)) if name == foo.name() => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn blocks_shadow_outer_scope() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        let x = ctx.symbol("x");
        assert_eq!(
            eval_prg_with_ctx(
                ctx,
                &[
                    Stmt::VarDecl(x.clone(), number(1.0)),
                    Stmt::Block(vec![
                        Stmt::VarDecl(x.clone(), number(2.0)),
                        Stmt::Print(Box::new(Expr::Var(x.clone()))),
                    ]),
                    Stmt::Print(Box::new(Expr::Var(x))),
                ]
            )?,
            "2\n1\n"
        );
        Ok(())
    }

    #[test]
    fn call_builtin_sqrt() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        assert_eq!(
            eval_prg_with_ctx(
                ctx.clone(),
                &[Stmt::Print(Box::new(Expr::Call(
                    Box::new(Expr::Var(ctx.symbol("sqrt"))),
                    vec![Expr::Number(4.0)]
                )))],
            )?,
            "2\n"
        );
        Ok(())
    }

    #[test]
    fn builtin_arity_is_checked() {
        let ctx = Context::new();
        match eval_prg_with_ctx(
            ctx.clone(),
            &[Stmt::Expr(Box::new(Expr::Call(
                Box::new(Expr::Var(ctx.symbol("sqrt"))),
                vec![],
            )))],
        ) {
            Err(RuntimeError::BadArity {
                callee,
                expected: 1,
                found: 0,
            }) if callee == "sqrt" => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn calling_a_number_fails() {
        match eval_expr(&Expr::Call(number(1.0), vec![])) {
            Err(RuntimeError::NotCallable) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn clock_returns_a_number() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        let mut out: Vec<u8> = Vec::new();
        let mut evaluator = Evaluator::new(&mut out, ctx.clone());
        let globals = evaluator.globals.clone();
        match evaluator.eval_expr(
            &Expr::Call(Box::new(Expr::Var(ctx.symbol("clock"))), vec![]),
            globals,
        )? {
            Value::Number(n) => assert!(n > 0.0),
            v => panic!("unexpected value: {:?}", v),
        }
        Ok(())
    }
}
