//! Lexical analyzer.

use std::error::Error;
use std::fmt;
use std::io::prelude::*;
use std::iter::Peekable;
use std::rc::Rc;

use crate::char_reader::{CharReader, CharReaderError};
use crate::ctx::Context;
use crate::diag::{LexError, LexErrorKind, Line};
use crate::token::{Token, TokenKind};

/// Turns a sequence of bytes into a sequence of tokens.
pub struct Scanner<R: BufRead> {
    input: Peekable<CharReader<R>>,
    line: Line,
    ctx: Rc<Context>,

    // Buffer used when scanning longer tokens.  Allocated here to reuse
    // memory.
    buf: String,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(input: R, ctx: Rc<Context>) -> Scanner<R> {
        Scanner {
            input: CharReader::new(input).peekable(),
            line: 1,
            ctx,
            buf: String::new(),
        }
    }

    /// Consumes the whole input and returns its tokens, the last of which
    /// is always `Eof`.  On error the tokens scanned so far are discarded.
    pub fn scan_to_end(mut self) -> Result<Vec<Token>, ScannerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.get_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Scans the next token.  Whitespace and comments are skipped; the
    /// returned token is tagged with the line of its first character.
    pub fn get_token(&mut self) -> Result<Token, ScannerError> {
        loop {
            match self.input.next() {
                None => return Ok(Token::new(TokenKind::Eof, self.line)),
                Some(Err(e)) => return Err(ScannerError::from(e)),
                Some(Ok(ch)) => match ch {
                    '\n' => self.line += 1,
                    ' ' | '\t' | '\r' => (),
                    '/' => {
                        if let Some(Ok('/')) = self.input.peek() {
                            self.skip_comment()?;
                        } else {
                            return Ok(Token::new(TokenKind::Slash, self.line));
                        }
                    }
                    _ => {
                        let line = self.line;
                        let kind = self.scan_kind(ch, line)?;
                        return Ok(Token::new(kind, line));
                    }
                },
            };
        }
    }

    fn scan_kind(&mut self, ch: char, line: Line) -> Result<TokenKind, ScannerError> {
        match ch {
            '(' => Ok(TokenKind::LeftParen),
            ')' => Ok(TokenKind::RightParen),
            '{' => Ok(TokenKind::LeftCurly),
            '}' => Ok(TokenKind::RightCurly),
            ',' => Ok(TokenKind::Comma),
            '.' => Ok(TokenKind::Dot),
            '-' => Ok(TokenKind::Minus),
            '+' => Ok(TokenKind::Plus),
            ';' => Ok(TokenKind::Semicolon),
            '*' => Ok(TokenKind::Star),
            '!' => self.one_or_two(TokenKind::Bang, TokenKind::BangEqual),
            '=' => self.one_or_two(TokenKind::Equal, TokenKind::EqualEqual),
            '<' => self.one_or_two(TokenKind::Less, TokenKind::LessEqual),
            '>' => self.one_or_two(TokenKind::Greater, TokenKind::GreaterEqual),
            '"' => self.scan_string(line),
            '0'..='9' => self.scan_number(ch, line),
            'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier(ch),
            _ => Err(ScannerError::Lex(LexError {
                line,
                kind: LexErrorKind::UnexpectedChar(ch),
            })),
        }
    }

    /// Matches the `=` of a two-character operator greedily.
    fn one_or_two(
        &mut self,
        single: TokenKind,
        double: TokenKind,
    ) -> Result<TokenKind, ScannerError> {
        if let Some(Ok('=')) = self.input.peek() {
            self.input.next();
            Ok(double)
        } else {
            Ok(single)
        }
    }

    /// Scans a string literal.  The opening quote has been consumed;
    /// `line` is its line, used for the unterminated-string diagnostic.
    /// Embedded newlines are allowed and counted.
    fn scan_string(&mut self, line: Line) -> Result<TokenKind, ScannerError> {
        self.buf.clear();
        loop {
            match self.input.next() {
                None => {
                    return Err(ScannerError::Lex(LexError {
                        line,
                        kind: LexErrorKind::UnterminatedString,
                    }))
                }
                Some(Err(e)) => return Err(ScannerError::from(e)),
                Some(Ok('"')) => return Ok(TokenKind::Str(self.buf.clone())),
                Some(Ok(ch)) => {
                    if ch == '\n' {
                        self.line += 1;
                    }
                    self.buf.push(ch);
                }
            }
        }
    }

    /// Scans a number literal: digits with at most one dot.  A trailing
    /// dot is accepted (`3.` is 3.0).  A second dot stops the literal and
    /// stays in the input; it only triggers a non-fatal warning.
    fn scan_number(&mut self, first_digit: char, line: Line) -> Result<TokenKind, ScannerError> {
        self.buf.clear();
        self.buf.push(first_digit);
        let mut dot_seen = false;
        loop {
            match self.input.peek() {
                Some(Ok(ch)) if ch.is_ascii_digit() => {
                    let ch = self.next_char_unchecked()?;
                    self.buf.push(ch);
                }
                Some(Ok('.')) if !dot_seen => {
                    dot_seen = true;
                    self.next_char_unchecked()?;
                    self.buf.push('.');
                }
                Some(Ok('.')) => {
                    eprintln!(
                        "Lexing error at line {}: malformed number literal \"{}.\"",
                        line, self.buf
                    );
                    break;
                }
                _ => break,
            }
        }

        let n = self.buf.parse::<f32>().map_err(|_| {
            ScannerError::Lex(LexError {
                line,
                kind: LexErrorKind::BadNumberLiteral(self.buf.clone()),
            })
        })?;
        Ok(TokenKind::Number(n))
    }

    fn scan_identifier(&mut self, first_char: char) -> Result<TokenKind, ScannerError> {
        self.buf.clear();
        self.buf.push(first_char);
        loop {
            match self.input.peek() {
                Some(Ok(ch)) if ch.is_ascii_alphanumeric() || *ch == '_' => {
                    let ch = self.next_char_unchecked()?;
                    self.buf.push(ch);
                }
                _ => break,
            }
        }

        let sym = self.ctx.symbol(&self.buf);
        if let Some(kind) = self.ctx.keyword(&sym) {
            Ok(kind)
        } else {
            Ok(TokenKind::Identifier(sym))
        }
    }

    fn skip_comment(&mut self) -> Result<(), ScannerError> {
        loop {
            match self.input.peek() {
                Some(Ok(ch)) if *ch != '\n' => {
                    self.next_char_unchecked()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Returns the next character or a read error.  Panics on EOF; only
    /// call after peek()ing.
    fn next_char_unchecked(&mut self) -> Result<char, ScannerError> {
        Ok(self.input.next().unwrap()?)
    }
}

#[derive(Debug)]
pub enum ScannerError {
    CharReader(CharReaderError),
    Lex(LexError),
}

impl Error for ScannerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScannerError::CharReader(e) => Some(e),
            ScannerError::Lex(_) => None,
        }
    }
}

impl fmt::Display for ScannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            ScannerError::CharReader(e) => write!(f, "read error: {}", e),
            ScannerError::Lex(e) => write!(f, "{}", e),
        }
    }
}

impl From<CharReaderError> for ScannerError {
    fn from(e: CharReaderError) -> ScannerError {
        ScannerError::CharReader(e)
    }
}

impl From<LexError> for ScannerError {
    fn from(e: LexError) -> ScannerError {
        ScannerError::Lex(e)
    }
}
