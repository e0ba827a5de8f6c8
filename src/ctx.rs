use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::interner::{Interner, Symbol};
use crate::token::TokenKind;

/// Mostly read-only state shared by all pipeline stages of one interpreter
/// session: the identifier interner and the keyword table.
///
/// Shared behind an `Rc` because the scanner, the evaluator and the session
/// facade all hold on to it.  Keywords are interned up front so the scanner
/// can classify an identifier with a single map lookup.
#[derive(Debug)]
pub struct Context {
    interner: RefCell<Interner>,
    keywords: HashMap<Symbol, TokenKind>,
}

impl Context {
    pub fn new() -> Rc<Self> {
        let mut interner = Interner::new();

        let mut keywords = HashMap::new();
        for (name, kind) in KEYWORDS.iter().cloned() {
            keywords.insert(interner.intern(name), kind);
        }

        Rc::new(Context {
            interner: RefCell::new(interner),
            keywords,
        })
    }

    /// Interns `name` if needed and returns its symbol.
    pub fn symbol(&self, name: &str) -> Symbol {
        self.interner.borrow_mut().intern(name)
    }

    /// Returns the keyword token for `id`, or `None` for a plain identifier.
    pub fn keyword(&self, id: &Symbol) -> Option<TokenKind> {
        self.keywords.get(id).cloned()
    }
}

const KEYWORDS: [(&str, TokenKind); 16] = [
    ("and", TokenKind::And),
    ("class", TokenKind::Class),
    ("else", TokenKind::Else),
    ("false", TokenKind::False),
    ("fun", TokenKind::Fun),
    ("for", TokenKind::For),
    ("if", TokenKind::If),
    ("nil", TokenKind::Nil),
    ("or", TokenKind::Or),
    ("print", TokenKind::Print),
    ("return", TokenKind::Return),
    ("super", TokenKind::Super),
    ("this", TokenKind::This),
    ("true", TokenKind::True),
    ("var", TokenKind::Var),
    ("while", TokenKind::While),
];
