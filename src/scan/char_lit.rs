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

//! Character-literal scanning (§4.7).

use crate::charclass;
use crate::error::{self, ReadResult};
use crate::parser::Parser;
use crate::value::{Value, ValueKind};

const NAMED: &[(&str, char)] = &[
    ("newline", '\n'),
    ("return", '\r'),
    ("space", ' '),
    ("tab", '\t'),
    ("formfeed", '\u{0C}'),
    ("backspace", '\u{08}'),
];

/// Scans a character literal starting at the cursor, which must be
/// positioned on the opening `\`.
pub fn scan<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    p.cursor.advance(1); // '\'

    let input = p.cursor.input();
    let body_start = p.cursor.position();

    if input.get(body_start).is_none() {
        return Err(error::invalid_character("Incomplete character literal", start));
    }

    // A named literal or \u escape is a run of ASCII letters/digits
    // long enough to be one; anything shorter is a single scalar.
    let word_end = {
        let mut i = body_start;
        while input.get(i).is_some_and(u8::is_ascii_alphanumeric) {
            i += 1;
        }
        i
    };

    if word_end > body_start + 1 && charclass::is_delimiter_or_eof(input.get(word_end).copied()) {
        let word = std::str::from_utf8(&input[body_start..word_end])
            .map_err(|_| error::invalid_character("Character literal is not valid UTF-8", start))?;

        if let Some(c) = word.strip_prefix('u').and_then(|hex| parse_u_escape(hex, start)) {
            p.cursor.advance(word_end - body_start);
            return Ok(Value::new(ValueKind::Character(c?)));
        }

        if let Some(&(_, c)) = NAMED.iter().find(|&&(name, _)| name == word) {
            p.cursor.advance(word_end - body_start);
            return Ok(Value::new(ValueKind::Character(c)));
        }

        return Err(error::invalid_character(
            format!("Unknown character literal '\\{}'", word),
            start,
        ));
    }

    // Single Unicode scalar.
    let rest = std::str::from_utf8(&input[body_start..])
        .map_err(|_| error::invalid_character("Character literal is not valid UTF-8", start))?;
    let c = rest
        .chars()
        .next()
        .ok_or_else(|| error::invalid_character("Incomplete character literal", start))?;
    p.cursor.advance(c.len_utf8());

    Ok(Value::new(ValueKind::Character(c)))
}

/// Parses the 4 hex digits following `\u`, rejecting the surrogate
/// range. Returns `None` if `hex` isn't exactly 4 hex digits (so the
/// caller can fall back to treating the word as a named literal,
/// which happens to share the `u...` prefix only for `\u` itself).
fn parse_u_escape(hex: &str, start: usize) -> Option<ReadResult<char>> {
    if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let code = u32::from_str_radix(hex, 16).ok()?;
    Some(if (0xD800..=0xDFFF).contains(&code) {
        Err(error::invalid_character("Surrogate codepoint in \\u escape", start))
    } else {
        char::from_u32(code).ok_or_else(|| error::invalid_character("Invalid \\u escape", start))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::cursor::Cursor;
    use crate::registry::DefaultReaderMode;

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
    fn scans_plain_char() {
        let arena = Arena::new();
        let mut p = parser(&arena, r"\a");
        let v = scan(&mut p).unwrap();
        assert!( matches!(v.kind, ValueKind::Character('a')) );
    }

    #[test]
    fn scans_named_newline() {
        let arena = Arena::new();
        let mut p = parser(&arena, r"\newline rest");
        let v = scan(&mut p).unwrap();
        assert!( matches!(v.kind, ValueKind::Character('\n')) );
    }

    #[test]
    fn scans_named_space() {
        let arena = Arena::new();
        let mut p = parser(&arena, r"\space");
        let v = scan(&mut p).unwrap();
        assert!( matches!(v.kind, ValueKind::Character(' ')) );
    }

    #[test]
    fn scans_unicode_escape() {
        let arena = Arena::new();
        let mut p = parser(&arena, "\\u00e9");
        let v = scan(&mut p).unwrap();
        assert!( matches!(v.kind, ValueKind::Character('\u{e9}')) );
    }

    #[test]
    fn rejects_surrogate_escape() {
        let arena = Arena::new();
        let mut p = parser(&arena, r"\ud800");
        assert!( scan(&mut p).is_err() );
    }

    #[test]
    fn rejects_unknown_named_literal() {
        let arena = Arena::new();
        let mut p = parser(&arena, r"\bogus");
        assert!( scan(&mut p).is_err() );
    }

    #[test]
    fn scans_non_ascii_scalar() {
        let arena = Arena::new();
        let mut p = parser(&arena, "\\\u{e9}");
        let v = scan(&mut p).unwrap();
        assert!( matches!(v.kind, ValueKind::Character('\u{e9}')) );
    }
}
