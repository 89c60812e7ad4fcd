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

//! The top-level driver (§4.18): whitespace skip, byte-class
//! dispatch, nesting-depth guard, and result assembly.

use tracing::trace;

use crate::arena::Arena;
use crate::charclass::{self, Class};
use crate::cursor::Cursor;
use crate::error::{self, ErrorKind, ReadError, ReadResult};
use crate::options::ParseOptions;
use crate::registry::{DefaultReaderMode, ReaderRegistry};
use crate::scan;
use crate::simd;
use crate::value::Value;

/// A parsed document: the root value, bound to the arena and input
/// it was read from.
#[derive(Debug)]
pub struct Document<'a> {
    pub root: Value<'a>,
}

/// Mutable parser state threaded through every scanner.
pub struct Parser<'a, 'r> {
    pub cursor: Cursor<'a>,
    pub arena: &'a Arena,
    pub depth: usize,
    pub max_depth: usize,
    pub discard: bool,
    pub readers: Option<&'r ReaderRegistry>,
    pub default_mode: DefaultReaderMode,
    pub metadata: bool,
    pub namespaced_maps: bool,
    pub ratios: bool,
    pub text_blocks: bool,
    pub digit_separators: bool,
}

/// Restores the parser's discard flag to its prior value when
/// dropped, including on an early `?` return from inside a discarded
/// form (§4.10, §9 "tag-reader suppression during discard").
pub struct DiscardGuard<'p, 'a, 'r> {
    parser: &'p mut Parser<'a, 'r>,
    previous: bool,
}

impl<'p, 'a, 'r> DiscardGuard<'p, 'a, 'r> {
    pub fn enter(parser: &'p mut Parser<'a, 'r>) -> Self {
        let previous = parser.discard;
        parser.discard = true;
        Self { parser, previous }
    }

    pub fn parser(&mut self) -> &mut Parser<'a, 'r> {
        self.parser
    }
}

impl Drop for DiscardGuard<'_, '_, '_> {
    fn drop(&mut self) {
        self.parser.discard = self.previous;
    }
}

impl<'a, 'r> Parser<'a, 'r> {
    fn offset(&self) -> usize {
        self.cursor.position()
    }

    fn skip_whitespace(&mut self) {
        let pos = simd::skip_whitespace(self.cursor.input(), self.cursor.position());
        self.cursor.advance(pos - self.cursor.position());
    }

    /// Enters one more level of collection nesting, failing with
    /// `depth-exceeded` if the configured limit is reached.
    pub fn enter_depth(&mut self) -> ReadResult<()> {
        if self.depth >= self.max_depth {
            return Err(error::depth_exceeded("Maximum nesting depth exceeded", self.offset()));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit_depth(&mut self) {
        self.depth -= 1;
    }

    /// Reads one value, recursing through the same dispatch the
    /// top-level driver uses. Collections call this for each element.
    pub fn read_value(&mut self) -> ReadResult<Value<'a>> {
        self.skip_whitespace();

        let start = self.offset();
        let b = match self.cursor.peek() {
            Some(b) => b,
            None => return Err(error::unexpected_eof("Unexpected end of input", start)),
        };

        trace!(offset = start, byte = b, "dispatch");

        match charclass::class(b) {
            Class::Identifier => scan::ident::scan(self),
            Class::StringOpen => scan::string::scan(self),
            Class::CharOpen => scan::char_lit::scan(self),
            Class::ListOpen => scan::collections::scan_list(self),
            Class::ListClose | Class::VectorClose | Class::MapClose => {
                Err(error::unmatched_delimiter("Unmatched closing delimiter", start))
            }
            Class::VectorOpen => scan::collections::scan_vector(self),
            Class::MapOpen => scan::collections::scan_map(self),
            Class::Sign => {
                if self.cursor.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                    scan::number::scan(self)
                } else {
                    scan::ident::scan(self)
                }
            }
            Class::Digit => scan::number::scan(self),
            Class::Hash => scan::tagged::scan_hash(self),
            Class::Meta if self.metadata => scan::meta::scan(self),
            Class::Meta => scan::ident::scan(self),
            Class::Whitespace | Class::Comment => unreachable!("whitespace already skipped"),
            Class::Other => Err(error::invalid_syntax(
                format!("Unexpected byte {:#04x}", b),
                start,
            )),
        }
    }
}

/// Reads one EDN value from `input`, allocating its tree out of
/// `arena`.
///
/// `arena` must be created by the caller and kept alive at least as
/// long as the returned [`Document`] is used; dropping it invalidates
/// the document (and the borrow checker enforces this automatically,
/// since [`Document`] borrows both `arena` and `input`).
pub fn read<'a, 'r>(
    arena: &'a Arena,
    input: &'a [u8],
    options: &ParseOptions<'r, 'a>,
) -> Result<Document<'a>, ReadError> {
    let mut parser = Parser {
        cursor: Cursor::new(input),
        arena,
        depth: 0,
        max_depth: options.max_depth,
        discard: false,
        readers: options.readers,
        default_mode: options.default_mode,
        metadata: options.metadata,
        namespaced_maps: options.namespaced_maps,
        ratios: options.ratios,
        text_blocks: options.text_blocks,
        digit_separators: options.digit_separators,
    };

    parser.skip_whitespace();

    if parser.cursor.at_eof() {
        return match options.eof_value {
            Some(v) => Ok(Document { root: v }),
            None => Err(error::unexpected_eof("Unexpected end of input", parser.offset()).with_location(input)),
        };
    }

    match parser.read_value() {
        Ok(root) => Ok(Document { root }),
        Err(e) => Err(e.with_location(input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn parse<'a>(arena: &'a Arena, input: &'a str) -> Result<Document<'a>, ReadError> {
        read(arena, input.as_bytes(), &ParseOptions::new())
    }

    #[test]
    fn read_nil() {
        let arena = Arena::new();
        let doc = parse(&arena, "nil").unwrap();
        assert!( doc.root.is_nil() );
    }

    #[test]
    fn read_int() {
        let arena = Arena::new();
        let doc = parse(&arena, "  42 ").unwrap();
        assert_eq!( doc.root.as_int(), Some(42) );
    }

    #[test]
    fn read_skips_comments() {
        let arena = Arena::new();
        let doc = parse(&arena, "; a comment\n7").unwrap();
        assert_eq!( doc.root.as_int(), Some(7) );
    }

    #[test]
    fn empty_input_is_unexpected_eof() {
        let arena = Arena::new();
        let err = parse(&arena, "").unwrap_err();
        assert_eq!( err.kind, ErrorKind::UnexpectedEof );
    }

    #[test]
    fn empty_input_returns_eof_value_when_configured() {
        let arena = Arena::new();
        let opts = ParseOptions::new().with_eof_value(Value::new(ValueKind::Keyword(
            crate::value::Ident::new(None, "eof"),
        )));
        let doc = read(&arena, b"", &opts).unwrap();
        assert_eq!( doc.root.as_keyword().unwrap().name, "eof" );
    }

    #[test]
    fn unmatched_delimiter_errors() {
        let arena = Arena::new();
        let err = parse(&arena, ")").unwrap_err();
        assert_eq!( err.kind, ErrorKind::UnmatchedDelimiter );
    }

    #[test]
    fn error_carries_resolved_location() {
        let arena = Arena::new();
        let err = parse(&arena, "[1 2").unwrap_err();
        assert_eq!( err.kind, ErrorKind::UnexpectedEof );
        assert_eq!( err.location.line, 1 );
    }
}
