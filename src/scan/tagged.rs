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

//! Everything that starts with `#`: tagged literals (§4.9), the
//! discard reader (§4.10), and the symbolic-value reader (§4.11).

use crate::error::{self, ReadResult};
use crate::parser::{DiscardGuard, Parser};
use crate::value::{Ident, Value, ValueKind};

/// Entry point for the `Class::Hash` dispatch arm. The cursor is
/// positioned on `#`.
pub fn scan_hash<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    let input = p.cursor.input();

    match input.get(start + 1) {
        Some(b'{') => super::collections::scan_set(p),
        Some(b'_') => scan_discard(p),
        Some(b'#') => scan_symbolic(p),
        Some(b':') if p.namespaced_maps => super::nsmap::scan(p),
        Some(_) => scan_tag(p),
        None => Err(error::unexpected_eof("Unexpected end of input", start + 1)),
    }
}

fn scan_tag<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    p.cursor.advance(1); // '#'

    if p.cursor.peek().is_some_and(|b| b.is_ascii_whitespace() || b == b',') {
        return Err(error::invalid_syntax("no whitespace allowed", p.cursor.position()));
    }

    let tag_value = super::ident::scan(p)?;
    let tag = match tag_value.kind {
        ValueKind::Symbol(Ident { namespace: None, name }) => name,
        ValueKind::Symbol(Ident { namespace: Some(ns), name }) => p
            .arena
            .try_alloc_str(&format!("{}/{}", ns, name))
            .map_err(|_| error::out_of_memory("Arena allocation failed", start))?,
        _ => return Err(error::invalid_syntax("Tagged literal must be a symbol", start)),
    };

    finish_tag(p, start, tag)
}

fn finish_tag<'a>(p: &mut Parser<'a, '_>, start: usize, tag: &'a str) -> ReadResult<Value<'a>> {
    let inner = p.read_value()?;

    if p.discard {
        // Reader invocation is suppressed during discard (§4.10); the
        // wrapped value still needs a shape to be thrown away.
        let inner = p
            .arena
            .try_alloc(inner)
            .map_err(|_| error::out_of_memory("Arena allocation failed", start))?;
        return Ok(Value::new(ValueKind::Tagged { tag, inner }));
    }

    if let Some(readers) = p.readers {
        if let Some(reader) = readers.lookup(tag) {
            return match reader(inner, p.arena) {
                Ok(v) => Ok(v),
                Err(msg) => Err(error::invalid_syntax(msg, start)),
            };
        }
    }

    use crate::registry::DefaultReaderMode;
    match p.default_mode {
        DefaultReaderMode::Passthrough => {
            let inner = p
                .arena
                .try_alloc(inner)
                .map_err(|_| error::out_of_memory("Arena allocation failed", start))?;
            Ok(Value::new(ValueKind::Tagged { tag, inner }))
        }
        DefaultReaderMode::Unwrap => Ok(inner),
        DefaultReaderMode::Error => {
            Err(error::unknown_tag(format!("No reader registered for tag '{}'", tag), start))
        }
    }
}

fn scan_discard<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    p.cursor.advance(2); // "#_"
    let mut guard = DiscardGuard::enter(p);
    guard.parser().read_value()?;
    drop(guard);
    p.read_value()
}

fn scan_symbolic<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    p.cursor.advance(2); // "##"

    let (end, _, _) = crate::simd::scan_identifier(p.cursor.input(), p.cursor.position());
    let word_start = p.cursor.position();
    let word = std::str::from_utf8(&p.cursor.input()[word_start..end])
        .map_err(|_| error::invalid_syntax("Symbolic value is not valid UTF-8", start))?;
    p.cursor.advance(end - word_start);

    match word {
        "Inf" => Ok(Value::new(ValueKind::Float(f64::INFINITY))),
        "-Inf" => Ok(Value::new(ValueKind::Float(f64::NEG_INFINITY))),
        "NaN" => Ok(Value::new(ValueKind::Float(f64::NAN))),
        other => Err(error::invalid_syntax(format!("Unknown symbolic value '##{}'", other), start)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::cursor::Cursor;
    use crate::error::ErrorKind;
    use crate::registry::{DefaultReaderMode, ReaderRegistry};

    fn parser<'a>(arena: &'a Arena, input: &'a str) -> Parser<'a, 'static> {
        Parser {
            cursor: Cursor::new(input.as_bytes()),
            arena,
            depth: 0,
            max_depth: 512,
            discard: false,
            readers: None,
            default_mode: DefaultReaderMode::Passthrough,
            metadata: true,
            namespaced_maps: true,
            ratios: true,
            text_blocks: true,
            digit_separators: true,
        }
    }

    #[test]
    fn passthrough_unknown_tag() {
        let arena = Arena::new();
        let mut p = parser(&arena, "#point [1 2]");
        let v = scan_hash(&mut p).unwrap();
        match v.kind {
            ValueKind::Tagged { tag, inner } => {
                assert_eq!( tag, "point" );
                assert_eq!( inner.as_vector().unwrap().len(), 2 );
            }
            _ => panic!("expected tagged value"),
        }
    }

    #[test]
    fn unwrap_mode_discards_tag() {
        let arena = Arena::new();
        let mut p = parser(&arena, "#point [1 2]");
        p.default_mode = DefaultReaderMode::Unwrap;
        let v = scan_hash(&mut p).unwrap();
        assert_eq!( v.as_vector().unwrap().len(), 2 );
    }

    #[test]
    fn error_mode_rejects_unknown_tag() {
        let arena = Arena::new();
        let mut p = parser(&arena, "#point [1 2]");
        p.default_mode = DefaultReaderMode::Error;
        let err = scan_hash(&mut p).unwrap_err();
        assert_eq!( err.kind, ErrorKind::UnknownTag );
    }

    #[test]
    fn registered_reader_is_invoked() {
        let mut readers = ReaderRegistry::new();
        readers.register("twice", |v, _arena| {
            Ok(Value::new(ValueKind::Int(v.as_int().unwrap_or(0) * 2)))
        });
        let arena = Arena::new();
        let mut p = parser(&arena, "#twice 21");
        p.readers = Some(&readers);
        let v = scan_hash(&mut p).unwrap();
        assert_eq!( v.as_int(), Some(42) );
    }

    #[test]
    fn discard_reads_and_drops_one_form() {
        let arena = Arena::new();
        let mut p = parser(&arena, "#_ 1 2");
        let v = scan_hash(&mut p).unwrap();
        assert_eq!( v.as_int(), Some(2) );
    }

    #[test]
    fn discard_suppresses_reader_invocation() {
        let mut readers = ReaderRegistry::new();
        readers.register("boom", |_v, _arena| Err("should not run".to_string()));
        let arena = Arena::new();
        let mut p = parser(&arena, "#_ #boom 1 2");
        p.readers = Some(&readers);
        let v = scan_hash(&mut p).unwrap();
        assert_eq!( v.as_int(), Some(2) );
    }

    #[test]
    fn symbolic_values() {
        let arena = Arena::new();
        let mut p = parser(&arena, "##Inf");
        let v = scan_hash(&mut p).unwrap();
        assert!( matches!(v.kind, ValueKind::Float(f) if f.is_infinite() && f.is_sign_positive()) );

        let mut p = parser(&arena, "##-Inf");
        let v = scan_hash(&mut p).unwrap();
        assert!( matches!(v.kind, ValueKind::Float(f) if f.is_infinite() && f.is_sign_negative()) );

        let mut p = parser(&arena, "##NaN");
        let v = scan_hash(&mut p).unwrap();
        assert!( matches!(v.kind, ValueKind::Float(f) if f.is_nan()) );
    }

    #[test]
    fn rejects_unknown_symbolic_value() {
        let arena = Arena::new();
        let mut p = parser(&arena, "##Bogus");
        assert!( scan_hash(&mut p).is_err() );
    }

    #[test]
    fn rejects_whitespace_after_hash() {
        let arena = Arena::new();
        let mut p = parser(&arena, "# point 1");
        let err = scan_hash(&mut p).unwrap_err();
        assert_eq!( err.kind, ErrorKind::InvalidSyntax );
    }
}
