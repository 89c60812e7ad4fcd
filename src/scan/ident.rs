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

//! Symbol and keyword scanning (§4.6).

use crate::error::{self, ReadResult};
use crate::parser::Parser;
use crate::simd;
use crate::value::{Ident, Value, ValueKind};

/// Scans a symbol or keyword starting at the cursor.
pub fn scan<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    let (end, first_slash, has_adjacent_colons) = simd::scan_identifier(p.cursor.input(), start);

    if end == start {
        return Err(error::invalid_syntax("Invalid identifier", start));
    }

    let raw = std::str::from_utf8(&p.cursor.input()[start..end])
        .map_err(|_| error::invalid_syntax("Identifier is not valid UTF-8", start))?;
    p.cursor.advance(end - start);

    if has_adjacent_colons {
        return Err(error::invalid_syntax("Invalid identifier", start));
    }

    if raw.starts_with(':') {
        return scan_keyword(raw, first_slash.map(|i| i - start), start);
    }

    match raw {
        "nil" => return Ok(Value::new(ValueKind::Nil)),
        "true" => return Ok(Value::new(ValueKind::Bool(true))),
        "false" => return Ok(Value::new(ValueKind::Bool(false))),
        _ => {}
    }

    Ok(Value::new(ValueKind::Symbol(split(raw, first_slash.map(|i| i - start), start)?)))
}

fn scan_keyword(raw: &str, slash_rel: Option<usize>, start: usize) -> ReadResult<Value<'static>> {
    let body = &raw[1..];
    if body.is_empty() {
        return Err(error::invalid_syntax("Empty keyword name", start));
    }
    if body.starts_with(':') {
        return Err(error::invalid_syntax("Keyword name cannot start with ':'", start));
    }

    let ident = split(body, slash_rel.map(|i| i - 1), start)?;
    if ident.name.starts_with(':') {
        return Err(error::invalid_syntax("Keyword name cannot start with ':'", start));
    }
    if ident.namespace == Some("") {
        return Err(error::invalid_syntax("Empty namespace in keyword", start));
    }
    if ident.namespace.is_some_and(|ns| ns.starts_with(':')) {
        return Err(error::invalid_syntax("Keyword namespace cannot start with ':'", start));
    }

    Ok(Value::new(ValueKind::Keyword(ident)))
}

/// Splits `raw` on its first `/`, validating that a single bare `/`
/// (the division symbol) and a properly namespaced token both parse,
/// while `/foo` and `foo/` do not.
fn split(raw: &'static str, slash_rel: Option<usize>, start: usize) -> ReadResult<Ident<'static>> {
    match slash_rel {
        None => Ok(Ident::new(None, raw)),
        Some(i) if raw == "/" => {
            let _ = i;
            Ok(Ident::new(None, raw))
        }
        Some(i) => {
            let (ns, rest) = raw.split_at(i);
            let name = &rest[1..];
            if ns.is_empty() || name.is_empty() {
                return Err(error::invalid_syntax("Invalid identifier", start));
            }
            Ok(Ident::new(Some(ns), name))
        }
    }
}
