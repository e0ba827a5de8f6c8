//! A tree-walking interpreter for the Lox language.
//!
//! See [Crafting Interpreters](https://craftinginterpreters.com/).
//!
//! Source text flows through three stages: the scanner turns bytes into
//! tokens, the parser turns tokens into an abstract syntax tree and the
//! evaluator walks the tree against a chain of lexical environments.
//! [`crate::interpreter::Interpreter`] wires the stages together and is
//! the only entry point the command line needs.
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].
//!
//! # Limitations
//!
//! - The scanner and parser do not attempt any error recovery.  They bail
//!   out on the first encountered error.
//! - Classes are not implemented: `class`, `this` and `super` are scanned
//!   as keywords but rejected by the parser.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod interpreter;

mod ast;
mod char_reader;
mod ctx;
mod diag;
mod eval;
mod interner;
mod parser;
mod scanner;
mod token;
