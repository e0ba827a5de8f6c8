//! Diagnostic types shared by the scanner and the parser.
//!
//! Each pipeline stage has its own error surface: the scanner reports
//! `Lexing error at line L: ...` and the parser `Parsing error on line L:
//! ...`.  Both carry the 1-based line on which the offending lexeme starts.

use std::error::Error;
use std::fmt;

/// Line number (starting at one).
pub type Line = u32;

/// A fatal lexical error, located at the line it was detected on.
///
/// For unterminated strings this is the line of the opening quote.
#[derive(Debug, PartialEq)]
pub struct LexError {
    pub line: Line,
    pub kind: LexErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum LexErrorKind {
    UnexpectedChar(char),
    UnterminatedString,
    BadNumberLiteral(String),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lexing error at line {}: {}", self.line, self.kind)
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnexpectedChar(ch) => {
                write!(f, "unexpected character \"{}\"", ch)
            }
            LexErrorKind::UnterminatedString => write!(f, "unterminated string"),
            LexErrorKind::BadNumberLiteral(lit) => {
                write!(f, "cannot parse number literal \"{}\"", lit)
            }
        }
    }
}

impl Error for LexError {}

/// A syntax error raised by the parser.  Parsing stops at the first one.
#[derive(Debug, PartialEq)]
pub struct SyntaxError {
    pub line: Line,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum SyntaxErrorKind {
    /// Found one token while a specific other one was required.
    UnexpectedToken { found: String, expected: String },
    ExpectedIdentifier,
    ExpectedPrimary,
    InvalidAssignmentTarget,
    TooManyParameters,
    TooManyArguments,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parsing error on line {}: {}", self.line, self.kind)
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::UnexpectedToken { found, expected } => {
                write!(f, "unexpected token '{}', expected '{}'", found, expected)
            }
            SyntaxErrorKind::ExpectedIdentifier => write!(f, "expected identifier"),
            SyntaxErrorKind::ExpectedPrimary => write!(f, "expected primary expression"),
            SyntaxErrorKind::InvalidAssignmentTarget => {
                write!(f, "invalid assignment target")
            }
            SyntaxErrorKind::TooManyParameters => {
                write!(f, "too many parameters (at most 254)")
            }
            SyntaxErrorKind::TooManyArguments => {
                write!(f, "too many arguments (at most 254)")
            }
        }
    }
}

impl Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_surface() {
        let e = LexError {
            line: 3,
            kind: LexErrorKind::UnexpectedChar('@'),
        };
        assert_eq!(
            e.to_string(),
            "Lexing error at line 3: unexpected character \"@\""
        );
    }

    #[test]
    fn unterminated_string_surface() {
        let e = LexError {
            line: 7,
            kind: LexErrorKind::UnterminatedString,
        };
        assert_eq!(e.to_string(), "Lexing error at line 7: unterminated string");
    }

    #[test]
    fn syntax_error_surface() {
        let e = SyntaxError {
            line: 2,
            kind: SyntaxErrorKind::UnexpectedToken {
                found: "EOF".to_string(),
                expected: ";".to_string(),
            },
        };
        assert_eq!(
            e.to_string(),
            "Parsing error on line 2: unexpected token 'EOF', expected ';'"
        );
    }
}
