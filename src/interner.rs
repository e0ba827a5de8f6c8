//! String interner for identifiers.
//!
//! Every identifier scanned from source is mapped to a [`Symbol`].  Two
//! occurrences of the same name always yield the same symbol, so the parser
//! and the evaluator compare and hash names by pointer instead of by
//! content.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Stores every symbol handed out so far.
#[derive(Debug, Default)]
pub struct Interner(HashSet<Symbol>);

impl Interner {
    pub fn new() -> Interner {
        Interner(HashSet::new())
    }

    /// Returns the unique symbol for `name`, creating it on first sight.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.0.get(name) {
            sym.clone()
        } else {
            let sym = Symbol(Rc::from(name));
            self.0.insert(sym.clone());
            sym
        }
    }
}

/// An interned, immutable name.
///
/// Uniqueness is guaranteed by the [`Interner`], so equality is pointer
/// equality.
#[derive(Debug, Hash, Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}
