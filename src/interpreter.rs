//! API to control the interpreter.

use std::error::Error;
use std::fmt;
use std::io::prelude::*;
use std::rc::Rc;

use crate::ctx::Context;
use crate::diag::SyntaxError;
use crate::eval::{Evaluator, RuntimeError};
use crate::parser::Parser;
use crate::scanner::{Scanner, ScannerError};

/// Tree-walk interpreter.
///
/// One `Interpreter` is one session: the global environment and the
/// identifier interner persist across `eval` calls, so a REPL can define a
/// function on one line and call it on the next.
///
/// # Example
///
/// ```
/// # use loxide::interpreter::{Interpreter, LoxError};
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// let func_def = r#"
///     fun max(x, y) {
///         if (x > y) {
///             return x;
///         } else {
///             return y;
///         }
///     }
/// "#;
/// interp.eval(func_def.as_bytes())?;
///
/// interp.eval("print max(10, 20);".as_bytes())?;
/// interp.eval("print max(5, 4);".as_bytes())?;
///
/// assert_eq!(output, b"20\n5\n");
/// # Ok::<(), LoxError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write> {
    ctx: Rc<Context>,
    evaluator: Evaluator<'t, W>,
}

/// Errors the interpreter can raise, one variant per pipeline stage.
#[derive(Debug)]
pub enum LoxError {
    /// Error occurring during lexical analysis.
    Scan(ScannerError),

    /// Error occurring during syntactic analysis.
    Parse(SyntaxError),

    /// Error occurring during evaluation.
    Runtime(RuntimeError),
}

impl fmt::Display for LoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoxError::Scan(e) => write!(f, "{}", e),
            LoxError::Parse(e) => write!(f, "{}", e),
            LoxError::Runtime(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl Error for LoxError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoxError::Scan(e) => Some(e),
            LoxError::Parse(e) => Some(e),
            LoxError::Runtime(e) => Some(e),
        }
    }
}

impl From<ScannerError> for LoxError {
    fn from(e: ScannerError) -> LoxError {
        LoxError::Scan(e)
    }
}

impl From<SyntaxError> for LoxError {
    fn from(e: SyntaxError) -> LoxError {
        LoxError::Parse(e)
    }
}

impl From<RuntimeError> for LoxError {
    fn from(e: RuntimeError) -> LoxError {
        LoxError::Runtime(e)
    }
}

impl<W: Write> Interpreter<'_, W> {
    pub fn new(output: &mut W) -> Interpreter<'_, W> {
        let ctx = Context::new();
        Interpreter {
            ctx: ctx.clone(),
            evaluator: Evaluator::new(output, ctx),
        }
    }

    /// Runs the full pipeline on `input`: scan, parse, evaluate.
    pub fn eval<R: BufRead>(&mut self, input: R) -> Result<(), LoxError> {
        let tokens = Scanner::new(input, self.ctx.clone()).scan_to_end()?;
        let prg = Parser::new(tokens).parse_program()?;
        self.evaluator.eval_program(&prg)?;
        Ok(())
    }
}
