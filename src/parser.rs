//! Recursive-descent parser.
//!
//! Operates a cursor over the scanned token sequence with single-token
//! lookahead.  There is no error recovery: the first syntax error aborts
//! the parse.

use std::rc::Rc;

use crate::ast::{Expr, Stmt};
use crate::diag::{Line, SyntaxError, SyntaxErrorKind};
use crate::interner::Symbol;
use crate::token::{Token, TokenKind};

/// Parameter and argument lists stop here; one more is a syntax error.
const MAX_ARITY: usize = 254;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Creates a parser over `tokens`.  The scanner always terminates the
    /// sequence with `Eof`; one is appended if the caller did not.
    pub fn new(mut tokens: Vec<Token>) -> Parser {
        match tokens.last() {
            Some(t) if t.kind == TokenKind::Eof => (),
            Some(t) => {
                let line = t.line;
                tokens.push(Token::new(TokenKind::Eof, line));
            }
            None => tokens.push(Token::new(TokenKind::Eof, 1)),
        }
        Parser { tokens, pos: 0 }
    }

    pub fn parse_program(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        let mut prg = vec![];
        while *self.current() != TokenKind::Eof {
            prg.push(self.declaration()?);
        }
        Ok(prg)
    }

    #[allow(dead_code)]
    fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.expression()
    }

    fn declaration(&mut self) -> Result<Stmt, SyntaxError> {
        match self.current() {
            TokenKind::Var => self.var_decl(),
            TokenKind::Fun => self.fun_decl(),
            _ => self.statement(),
        }
    }

    /// Parses a variable declaration.  The current token is `var`.
    fn var_decl(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        let name = self.identifier()?;
        let init = match self.current() {
            TokenKind::Equal => {
                self.advance();
                self.expression()?
            }
            _ => Expr::Nil,
        };
        self.consume(TokenKind::Semicolon)?;
        Ok(Stmt::VarDecl(name, Box::new(init)))
    }

    fn fun_decl(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        let name_line = self.line();
        let name = self.identifier()?;
        self.consume(TokenKind::LeftParen)?;
        let mut params = vec![];
        if *self.current() != TokenKind::RightParen {
            loop {
                if params.len() >= MAX_ARITY {
                    return Err(SyntaxError {
                        line: name_line,
                        kind: SyntaxErrorKind::TooManyParameters,
                    });
                }
                params.push(self.identifier()?);
                if *self.current() != TokenKind::Comma {
                    break;
                }
                self.advance();
            }
        }
        self.consume(TokenKind::RightParen)?;
        let body = self.block()?;
        Ok(Stmt::FunDecl(name, params, Rc::new(body)))
    }

    fn identifier(&mut self) -> Result<Symbol, SyntaxError> {
        if let TokenKind::Identifier(id) = self.current().clone() {
            self.advance();
            Ok(id)
        } else {
            Err(self.error(SyntaxErrorKind::ExpectedIdentifier))
        }
    }

    fn statement(&mut self) -> Result<Stmt, SyntaxError> {
        match self.current() {
            TokenKind::Print => {
                self.advance();
                let expr = Box::new(self.expression()?);
                self.consume(TokenKind::Semicolon)?;
                Ok(Stmt::Print(expr))
            }
            TokenKind::LeftCurly => self.block(),
            TokenKind::If => self.if_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::Semicolon => {
                self.advance();
                Ok(Stmt::Nop)
            }
            TokenKind::Return => {
                self.advance();
                let ret_expr = if *self.current() == TokenKind::Semicolon {
                    Expr::Nil
                } else {
                    self.expression()?
                };
                self.consume(TokenKind::Semicolon)?;
                Ok(Stmt::Return(Box::new(ret_expr)))
            }
            _ => {
                let expr = Box::new(self.expression()?);
                self.consume(TokenKind::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn if_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        self.consume(TokenKind::LeftParen)?;
        let cond = Box::new(self.expression()?);
        self.consume(TokenKind::RightParen)?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if *self.current() == TokenKind::Else {
            self.advance();
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If(cond, then_branch, else_branch))
    }

    fn while_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        self.consume(TokenKind::LeftParen)?;
        let cond = Box::new(self.expression()?);
        self.consume(TokenKind::RightParen)?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While(cond, body))
    }

    /// Desugars `for (init; cond; incr) body` into
    /// `{ init; while (cond) { body; incr; } }`.  A missing condition
    /// becomes the literal `true`; a missing initializer or increment
    /// drops the corresponding wrapper.
    fn for_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        self.consume(TokenKind::LeftParen)?;

        let init = match self.current() {
            TokenKind::Semicolon => {
                self.advance();
                None
            }
            TokenKind::Var => Some(self.var_decl()?),
            _ => {
                let expr = self.expression()?;
                self.consume(TokenKind::Semicolon)?;
                Some(Stmt::Expr(Box::new(expr)))
            }
        };

        let cond = if *self.current() == TokenKind::Semicolon {
            Expr::Bool(true)
        } else {
            self.expression()?
        };
        self.consume(TokenKind::Semicolon)?;

        let incr = if *self.current() == TokenKind::RightParen {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::RightParen)?;

        let mut body = self.statement()?;
        if let Some(incr) = incr {
            body = Stmt::Block(vec![body, Stmt::Expr(Box::new(incr))]);
        }
        let mut desugared = Stmt::While(Box::new(cond), Box::new(body));
        if let Some(init) = init {
            desugared = Stmt::Block(vec![init, desugared]);
        }
        Ok(desugared)
    }

    fn block(&mut self) -> Result<Stmt, SyntaxError> {
        self.consume(TokenKind::LeftCurly)?;
        let mut stmts = vec![];
        loop {
            match self.current() {
                TokenKind::RightCurly => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => {
                    return Err(self.error(SyntaxErrorKind::UnexpectedToken {
                        found: TokenKind::Eof.to_string(),
                        expected: TokenKind::RightCurly.to_string(),
                    }))
                }
                _ => stmts.push(self.declaration()?),
            }
        }
        Ok(Stmt::Block(stmts))
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        self.assignment()
    }

    /// Right-associative; the left-hand side must be a plain identifier.
    fn assignment(&mut self) -> Result<Expr, SyntaxError> {
        let lhs = self.logic_or()?;
        if *self.current() == TokenKind::Equal {
            let equal_line = self.line();
            self.advance();
            let rhs = self.assignment()?;
            if let Expr::Var(name) = lhs {
                Ok(Expr::Assign(name, Box::new(rhs)))
            } else {
                Err(SyntaxError {
                    line: equal_line,
                    kind: SyntaxErrorKind::InvalidAssignmentTarget,
                })
            }
        } else {
            Ok(lhs)
        }
    }

    fn logic_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.logic_and()?;
        while *self.current() == TokenKind::Or {
            self.advance();
            expr = Expr::Or(Box::new(expr), Box::new(self.logic_and()?));
        }
        Ok(expr)
    }

    fn logic_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.equality()?;
        while *self.current() == TokenKind::And {
            self.advance();
            expr = Expr::And(Box::new(expr), Box::new(self.equality()?));
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.comparison()?;
        loop {
            match self.current() {
                TokenKind::EqualEqual => {
                    self.advance();
                    expr = Expr::Equal(Box::new(expr), Box::new(self.comparison()?));
                }
                TokenKind::BangEqual => {
                    self.advance();
                    expr = Expr::NotEqual(Box::new(expr), Box::new(self.comparison()?));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.term()?;
        loop {
            match self.current() {
                TokenKind::Less => {
                    self.advance();
                    expr = Expr::Less(Box::new(expr), Box::new(self.term()?));
                }
                TokenKind::LessEqual => {
                    self.advance();
                    expr = Expr::LessEqual(Box::new(expr), Box::new(self.term()?));
                }
                TokenKind::Greater => {
                    self.advance();
                    expr = Expr::Greater(Box::new(expr), Box::new(self.term()?));
                }
                TokenKind::GreaterEqual => {
                    self.advance();
                    expr = Expr::GreaterEqual(Box::new(expr), Box::new(self.term()?));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.factor()?;
        loop {
            match self.current() {
                TokenKind::Plus => {
                    self.advance();
                    expr = Expr::Add(Box::new(expr), Box::new(self.factor()?));
                }
                TokenKind::Minus => {
                    self.advance();
                    expr = Expr::Sub(Box::new(expr), Box::new(self.factor()?));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.unary()?;
        loop {
            match self.current() {
                TokenKind::Star => {
                    self.advance();
                    expr = Expr::Mul(Box::new(expr), Box::new(self.unary()?));
                }
                TokenKind::Slash => {
                    self.advance();
                    expr = Expr::Div(Box::new(expr), Box::new(self.unary()?));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        match self.current() {
            TokenKind::Bang => {
                self.advance();
                Ok(Expr::Not(Box::new(self.unary()?)))
            }
            TokenKind::Minus => {
                self.advance();
                Ok(Expr::UnaryMinus(Box::new(self.unary()?)))
            }
            _ => self.call(),
        }
    }

    /// Parses a primary expression followed by any number of chained
    /// argument lists, so `f(a)(b)` calls the result of `f(a)`.
    fn call(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.primary()?;
        while *self.current() == TokenKind::LeftParen {
            let paren_line = self.line();
            self.advance();
            let mut args = vec![];
            if *self.current() != TokenKind::RightParen {
                loop {
                    if args.len() >= MAX_ARITY {
                        return Err(SyntaxError {
                            line: paren_line,
                            kind: SyntaxErrorKind::TooManyArguments,
                        });
                    }
                    args.push(self.expression()?);
                    if *self.current() != TokenKind::Comma {
                        break;
                    }
                    self.advance();
                }
            }
            self.consume(TokenKind::RightParen)?;
            expr = Expr::Call(Box::new(expr), args);
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.current().clone() {
            TokenKind::Identifier(sym) => {
                self.advance();
                Ok(Expr::Var(sym))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Expr::Nil)
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Str(Rc::from(s.as_str())))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::RightParen)?;
                Ok(Expr::Group(Box::new(expr)))
            }
            _ => Err(self.error(SyntaxErrorKind::ExpectedPrimary)),
        }
    }

    fn current(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn line(&self) -> Line {
        self.tokens[self.pos].line
    }

    /// Moves the cursor forward; it never leaves the final `Eof` token.
    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn consume(&mut self, expected: TokenKind) -> Result<(), SyntaxError> {
        if *self.current() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(SyntaxErrorKind::UnexpectedToken {
                found: self.current().to_string(),
                expected: expected.to_string(),
            }))
        }
    }

    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError {
            line: self.line(),
            kind,
        }
    }
}
