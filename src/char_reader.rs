//! Byte-reader to character-iterator adapter.
//!
//! The scanner wants to peek characters, but `BufRead` only hands out
//! bytes.  This iterator decodes UTF-8 on the fly: ASCII bytes pass
//! straight through (everything outside string literals is ASCII anyway)
//! and multi-byte sequences are decoded so string literals can carry
//! arbitrary text.

use std::error::Error;
use std::fmt;
use std::io::prelude::*;
use std::io::{self, Bytes};
use std::str::{self, Utf8Error};

/// Iterator over a buffered reader that yields characters rather than bytes.
#[derive(Debug)]
pub struct CharReader<R: BufRead> {
    input: Bytes<R>,
}

impl<R: BufRead> CharReader<R> {
    pub fn new(input: R) -> CharReader<R> {
        CharReader {
            input: input.bytes(),
        }
    }

    /// Number of bytes in the UTF-8 sequence introduced by `first`, if it
    /// is a valid leading byte.
    fn sequence_width(first: u8) -> Option<usize> {
        match first {
            0b1100_0000..=0b1101_1111 => Some(2),
            0b1110_0000..=0b1110_1111 => Some(3),
            0b1111_0000..=0b1111_0111 => Some(4),
            _ => None,
        }
    }

    fn decode_multi_byte(&mut self, first: u8) -> Result<char, CharReaderError> {
        let width = match Self::sequence_width(first) {
            Some(w) => w,
            None => return Err(CharReaderError::BadStartByte(first)),
        };

        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.input.next() {
                Some(Ok(b)) if b & 0b1100_0000 == 0b1000_0000 => *slot = b,
                Some(Ok(b)) => return Err(CharReaderError::BadContinuationByte(b)),
                Some(Err(e)) => return Err(CharReaderError::from(e)),
                None => return Err(CharReaderError::TruncatedChar),
            }
        }

        let s = str::from_utf8(&buf[..width])?;
        match s.chars().next() {
            Some(ch) => Ok(ch),
            None => Err(CharReaderError::TruncatedChar),
        }
    }
}

impl<R: BufRead> Iterator for CharReader<R> {
    type Item = Result<char, CharReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.input.next()? {
            Ok(b) if b.is_ascii() => Some(Ok(b as char)),
            Ok(b) => Some(self.decode_multi_byte(b)),
            Err(e) => Some(Err(CharReaderError::from(e))),
        }
    }
}

/// Errors raised while reading bytes and decoding them to UTF-8.
#[derive(Debug)]
pub enum CharReaderError {
    Io(io::Error),
    BadStartByte(u8),
    BadContinuationByte(u8),
    TruncatedChar,
    Utf8(Utf8Error),
}

impl fmt::Display for CharReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharReaderError::Io(e) => write!(f, "failed to read bytes: {}", e),
            CharReaderError::BadStartByte(b) => {
                write!(f, "unexpected UTF-8 start byte: {:#010b}", b)
            }
            CharReaderError::BadContinuationByte(b) => {
                write!(f, "unexpected UTF-8 continuation byte: {:#010b}", b)
            }
            CharReaderError::TruncatedChar => {
                write!(f, "input ends in the middle of a UTF-8 sequence")
            }
            CharReaderError::Utf8(e) => {
                write!(f, "failed to decode byte sequence as UTF-8: {}", e)
            }
        }
    }
}

impl Error for CharReaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CharReaderError::Io(e) => Some(e),
            CharReaderError::Utf8(e) => Some(e),
            CharReaderError::BadStartByte(_)
            | CharReaderError::BadContinuationByte(_)
            | CharReaderError::TruncatedChar => None,
        }
    }
}

impl From<io::Error> for CharReaderError {
    fn from(err: io::Error) -> CharReaderError {
        CharReaderError::Io(err)
    }
}

impl From<Utf8Error> for CharReaderError {
    fn from(err: Utf8Error) -> CharReaderError {
        CharReaderError::Utf8(err)
    }
}
