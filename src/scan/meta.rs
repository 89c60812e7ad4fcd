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

//! Metadata reader (§4.12): `^meta form`, with shorthand folding for
//! keyword/string/symbol/vector metadata forms.

use crate::equality::values_eq;
use crate::error::{self, ReadResult};
use crate::parser::Parser;
use crate::value::{Ident, Value, ValueKind};

/// Entry point for the `Class::Meta` dispatch arm. The cursor is
/// positioned on `^`.
pub fn scan<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    p.cursor.advance(1); // '^'

    let meta_form = p.read_value()?;
    let (new_keys, new_values) = fold_shorthand(meta_form, start)?;

    let target = p.read_value()?;
    validate_target(&target, start)?;

    let (keys, values) = match target.meta {
        Some(existing) => {
            let (old_keys, old_values) = existing
                .as_map()
                .expect("metadata value is always a map");
            concat_entries(old_keys, old_values, &new_keys, &new_values)
        }
        None => (new_keys, new_values),
    };

    let meta = Value::new(ValueKind::Map {
        keys: p
            .arena
            .try_alloc_slice_copy(&keys)
            .map_err(|_| error::out_of_memory("Arena allocation failed", start))?,
        values: p
            .arena
            .try_alloc_slice_copy(&values)
            .map_err(|_| error::out_of_memory("Arena allocation failed", start))?,
    });
    let meta = p
        .arena
        .try_alloc(meta)
        .map_err(|_| error::out_of_memory("Arena allocation failed", start))?;

    Ok(Value::with_meta(target.kind, meta))
}

fn validate_target(target: &Value, start: usize) -> ReadResult<()> {
    match target.kind {
        ValueKind::List(_)
        | ValueKind::Vector(_)
        | ValueKind::Set(_)
        | ValueKind::Map { .. }
        | ValueKind::Tagged { .. }
        | ValueKind::Symbol(_) => Ok(()),
        _ => Err(error::invalid_syntax(
            "Metadata may only attach to a collection, tagged literal, or symbol",
            start,
        )),
    }
}

/// Folds a keyword/string/symbol/vector metadata form into the
/// (key, value) list a bare map would have produced; a map form
/// passes through as-is.
fn fold_shorthand<'a>(form: Value<'a>, start: usize) -> ReadResult<(Vec<Value<'a>>, Vec<Value<'a>>)> {
    match form.kind {
        ValueKind::Map { keys, values } => Ok((keys.to_vec(), values.to_vec())),
        ValueKind::Keyword(_) => Ok((vec![form], vec![Value::new(ValueKind::Bool(true))])),
        ValueKind::String(_) | ValueKind::Symbol(_) => {
            let tag = Value::new(ValueKind::Keyword(Ident::new(None, "tag")));
            Ok((vec![tag], vec![form]))
        }
        ValueKind::Vector(_) => {
            let param_tags = Value::new(ValueKind::Keyword(Ident::new(None, "param-tags")));
            Ok((vec![param_tags], vec![form]))
        }
        _ => Err(error::invalid_syntax(
            "Metadata form must be a map, keyword, string, symbol, or vector",
            start,
        )),
    }
}

fn concat_entries<'a>(
    old_keys: &[Value<'a>],
    old_values: &[Value<'a>],
    new_keys: &[Value<'a>],
    new_values: &[Value<'a>],
) -> (Vec<Value<'a>>, Vec<Value<'a>>) {
    let mut keys: Vec<Value<'a>> = old_keys.to_vec();
    let mut values: Vec<Value<'a>> = old_values.to_vec();

    for (k, v) in new_keys.iter().zip(new_values.iter()) {
        match keys.iter().position(|existing| values_eq(existing, k)) {
            Some(i) => values[i] = *v,
            None => {
                keys.push(*k);
                values.push(*v);
            }
        }
    }

    (keys, values)
}
