// This file is part of edn, an EDN reader.
// Copyright (C) 2026
//
// edn is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// edn is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with edn.  If not, see <http://www.gnu.org/licenses/>.

//! The reader's error taxonomy.

use std::fmt;

use crate::location::Location;

/// A single kind of read failure, independent of where it occurred.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    InvalidSyntax,
    UnexpectedEof,
    UnmatchedDelimiter,
    InvalidString,
    InvalidNumber,
    InvalidCharacter,
    InvalidMap,
    DuplicateKey,
    DuplicateElement,
    UnknownTag,
    OutOfMemory,
    DepthExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::InvalidSyntax => "invalid-syntax",
            ErrorKind::UnexpectedEof => "unexpected-eof",
            ErrorKind::UnmatchedDelimiter => "unmatched-delimiter",
            ErrorKind::InvalidString => "invalid-string",
            ErrorKind::InvalidNumber => "invalid-number",
            ErrorKind::InvalidCharacter => "invalid-character",
            ErrorKind::InvalidMap => "invalid-map",
            ErrorKind::DuplicateKey => "duplicate-key",
            ErrorKind::DuplicateElement => "duplicate-element",
            ErrorKind::UnknownTag => "unknown-tag",
            ErrorKind::OutOfMemory => "out-of-memory",
            ErrorKind::DepthExceeded => "depth-exceeded",
        })
    }
}

/// A reader failure: a kind, a message, and the byte offset at which
/// it was detected. The offset is resolved to a [`Location`] only
/// once the failure reaches the top-level driver (see
/// [`crate::parser::read`]), so that scanners deep in the call stack
/// never need the original input just to report where they are.
#[derive(thiserror::Error, Clone, Debug)]
#[error("{kind}: {message}")]
pub struct ReadError {
    pub kind: ErrorKind,
    pub message: String,
    pub offset: usize,
    pub location: Location,
}

impl ReadError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, offset: usize) -> Self {
        Self { kind, message: message.into(), offset, location: Location::UNKNOWN }
    }

    /// Returns a copy of this error with its location resolved
    /// against `input`.
    pub fn with_location(mut self, input: &[u8]) -> Self {
        self.location = crate::location::locate(input, self.offset);
        self
    }
}

pub type ReadResult<T> = Result<T, ReadError>;

macro_rules! err_fn {
    ($name:ident, $kind:ident) => {
        pub fn $name(message: impl Into<String>, offset: usize) -> ReadError {
            ReadError::new(ErrorKind::$kind, message, offset)
        }
    };
}

err_fn!(invalid_syntax, InvalidSyntax);
err_fn!(unexpected_eof, UnexpectedEof);
err_fn!(unmatched_delimiter, UnmatchedDelimiter);
err_fn!(invalid_string, InvalidString);
err_fn!(invalid_number, InvalidNumber);
err_fn!(invalid_character, InvalidCharacter);
err_fn!(invalid_map, InvalidMap);
err_fn!(duplicate_key, DuplicateKey);
err_fn!(duplicate_element, DuplicateElement);
err_fn!(unknown_tag, UnknownTag);
err_fn!(out_of_memory, OutOfMemory);
err_fn!(depth_exceeded, DepthExceeded);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = invalid_number("bad exponent", 4);
        assert_eq!( format!("{}", e), "invalid-number: bad exponent" );
    }

    #[test]
    fn error_with_location() {
        let e = unexpected_eof("ran off the end", 4).with_location(b"ab\ncd");
        assert_eq!( e.location, Location::new(2, 2) );
    }
}
