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

//! String scanning (§4.4), including the text-block variant (§4.4.1).

use crate::arena::Arena;
use crate::error::{self, ReadResult};
use crate::parser::Parser;
use crate::simd;
use crate::value::{Str, Value, ValueKind};

/// Scans a string starting at the cursor, which must be positioned on
/// the opening `"`.
pub fn scan<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();

    if p.text_blocks && is_text_block_open(p.cursor.input(), start) {
        return text_block::scan(p);
    }

    p.cursor.advance(1); // opening '"'
    let body_start = p.cursor.position();
    let (close, has_escapes) = simd::find_quote(p.cursor.input(), body_start);

    if p.cursor.input().get(close) != Some(&b'"') {
        return Err(error::invalid_string("Unterminated string", start));
    }

    let raw = std::str::from_utf8(&p.cursor.input()[body_start..close])
        .map_err(|_| error::invalid_string("String is not valid UTF-8", start))?;
    p.cursor.advance(close - body_start + 1); // body + closing '"'

    Ok(Value::new(ValueKind::String(Str::new(raw, has_escapes))))
}

fn is_text_block_open(input: &[u8], start: usize) -> bool {
    input.get(start) == Some(&b'"')
        && input.get(start + 1) == Some(&b'"')
        && input.get(start + 2) == Some(&b'"')
        && input.get(start + 3) == Some(&b'\n')
}

/// Decodes the escape sequences in `raw` (the slice between the
/// quotes, not including them), allocating the decoded copy in
/// `arena`. Only called when the scanner observed at least one `\`.
pub fn decode_escapes<'a>(raw: &str, arena: &'a Arena) -> ReadResult<&'a str> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let (_, esc) = chars.next().ok_or_else(|| {
            error::invalid_string("Unterminated escape sequence", i)
        })?;
        match esc {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'f' => out.push('\u{0C}'),
            'b' => out.push('\u{08}'),
            'u' => {
                let mut hex = String::with_capacity(4);
                for _ in 0..4 {
                    let (_, h) = chars.next().ok_or_else(|| {
                        error::invalid_string("Incomplete \\u escape", i)
                    })?;
                    hex.push(h);
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| error::invalid_string("Invalid \\u escape", i))?;
                if (0xD800..=0xDFFF).contains(&code) {
                    return Err(error::invalid_string("Surrogate codepoint in \\u escape", i));
                }
                let ch = char::from_u32(code)
                    .ok_or_else(|| error::invalid_string("Invalid \\u escape", i))?;
                out.push(ch);
            }
            other => {
                return Err(error::invalid_string(
                    format!("Unsupported escape sequence '\\{}'", other),
                    i,
                ));
            }
        }
    }

    arena.try_alloc_str(&out).map_err(|_| error::out_of_memory("Arena allocation failed", 0))
}

mod text_block {
    use super::*;

    /// Scans a `"""`-delimited text block (§4.4.1).
    pub fn scan<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
        let start = p.cursor.position();
        p.cursor.advance(4); // opening """ and the newline

        let mut lines: Vec<(usize, usize, bool)> = Vec::new(); // (content_start, content_end, is_terminal)
        loop {
            let line_start = p.cursor.position();
            if let Some(close_rel) = find_closing_on_line(p.cursor.input(), line_start) {
                let content_end = line_start + close_rel;
                lines.push((line_start, content_end, true));
                p.cursor.advance(close_rel + 3);
                break;
            }

            let input = p.cursor.input();
            let mut i = line_start;
            while i < input.len() && input[i] != b'\n' {
                i += 1;
            }
            if i >= input.len() {
                return Err(error::invalid_string("Unterminated text block", start));
            }
            lines.push((line_start, i, false));
            p.cursor.advance(i - line_start + 1);
        }

        let input = p.cursor.input();
        let lwp = lines
            .iter()
            .filter(|&&(s, e, terminal)| terminal || input[s..e].iter().any(|&b| b != b' ' && b != b'\t'))
            .map(|&(s, e)| leading_ws(&input[s..e]))
            .min()
            .unwrap_or(0);

        let mut out = String::new();
        for &(s, e, terminal) in &lines {
            let mut content = &input[s..e];
            let strip = lwp.min(leading_ws(content));
            content = &content[strip..];
            let trimmed = trim_trailing_ws(content);
            let text = std::str::from_utf8(trimmed)
                .map_err(|_| error::invalid_string("Text block is not valid UTF-8", start))?;
            let text = text.replace("\\\"\"\"", "\"\"\"");

            if terminal {
                // A closing """ on its own line contributes nothing
                // further; one preceded by content on the same line
                // contributes that content with no trailing newline.
                out.push_str(&text);
            } else {
                out.push_str(&text);
                out.push('\n');
            }
        }

        let text = p
            .arena
            .try_alloc_str(&out)
            .map_err(|_| error::out_of_memory("Arena allocation failed", start))?;
        Ok(Value::new(ValueKind::String(Str::new(text, false))))
    }

    fn find_closing_on_line(input: &[u8], start: usize) -> Option<usize> {
        let mut i = start;
        while i < input.len() && input[i] != b'\n' {
            if input[i..].starts_with(b"\"\"\"") {
                return Some(i - start);
            }
            i += 1;
        }
        None
    }

    fn leading_ws(s: &[u8]) -> usize {
        s.iter().take_while(|&&b| b == b' ' || b == b'\t').count()
    }

    fn trim_trailing_ws(s: &[u8]) -> &[u8] {
        let end = s.iter().rposition(|&b| b != b' ' && b != b'\t').map_or(0, |i| i + 1);
        &s[..end]
    }
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
    fn scans_simple_string() {
        let arena = Arena::new();
        let mut p = parser(&arena, "\"hello\" rest");
        let v = scan(&mut p).unwrap();
        let s = v.as_str(&arena).unwrap().unwrap();
        assert_eq!( s, "hello" );
    }

    #[test]
    fn scans_string_with_escapes() {
        let arena = Arena::new();
        let mut p = parser(&arena, r#""a\nb""#);
        let v = scan(&mut p).unwrap();
        let s = v.as_str(&arena).unwrap().unwrap();
        assert_eq!( s, "a\nb" );
    }

    #[test]
    fn rejects_unterminated_string() {
        let arena = Arena::new();
        let mut p = parser(&arena, "\"no close");
        assert!( scan(&mut p).is_err() );
    }

    #[test]
    fn rejects_unicode_escape_surrogate() {
        let arena = Arena::new();
        let raw = r"\ud800";
        assert!( decode_escapes(raw, &arena).is_err() );
    }

    #[test]
    fn decodes_unicode_escape() {
        let arena = Arena::new();
        let raw = "\\u00e9";
        let decoded = decode_escapes(raw, &arena).unwrap();
        assert_eq!( decoded, "\u{e9}" );
    }

    #[test]
    fn scans_text_block() {
        let arena = Arena::new();
        let input = "\"\"\"\n   SELECT *\n     FROM t\n   \"\"\"";
        let mut p = parser(&arena, input);
        let v = scan(&mut p).unwrap();
        let s = v.as_str(&arena).unwrap().unwrap();
        assert_eq!( s, "SELECT *\n  FROM t\n" );
    }
}
