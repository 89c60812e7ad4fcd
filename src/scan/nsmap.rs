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

//! Namespaced-map scanning (§4.13): `#:ns{...}`.

use crate::error::{self, ReadResult};
use crate::parser::Parser;
use crate::value::{Ident, Value, ValueKind};

/// Entry point from [`super::tagged::scan_hash`]. The cursor is
/// positioned on `#`, with `input[pos+1] == ':'`.
pub fn scan<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    p.cursor.advance(2); // "#:"

    let ns_value = super::ident::scan(p)?;
    let ns = match ns_value.kind {
        ValueKind::Symbol(Ident { namespace: None, name }) => name,
        _ => return Err(error::invalid_syntax("Namespaced map requires a namespace symbol", start)),
    };

    if p.cursor.peek() != Some(b'{') {
        return Err(error::invalid_syntax("Expected '{' after namespaced map prefix", p.cursor.position()));
    }

    let map = super::collections::scan_map(p)?;
    let (keys, values) = map.as_map().expect("scan_map always returns a Map");

    let rewritten: Vec<Value<'a>> = keys
        .iter()
        .map(|k| match k.kind {
            ValueKind::Keyword(Ident { namespace: None, name }) => {
                Value::new(ValueKind::Keyword(Ident::new(Some(ns), name)))
            }
            _ => *k,
        })
        .collect();

    let keys = p
        .arena
        .try_alloc_slice_copy(&rewritten)
        .map_err(|_| error::out_of_memory("Arena allocation failed", start))?;

    Ok(Value::new(ValueKind::Map { keys, values }))
}
