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

//! List, vector, set, and map scanning (§4.8).

use crate::charclass::Class;
use crate::error::{self, ReadResult};
use crate::parser::Parser;
use crate::uniqueness;
use crate::value::{Value, ValueKind};

pub fn scan_list<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    let (items, _) = read_elements(p, 1, b')')?;
    Ok(Value::new(ValueKind::List(try_alloc_slice(p, start, &items)?)))
}

pub fn scan_vector<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    let (items, _) = read_elements(p, 1, b']')?;
    Ok(Value::new(ValueKind::Vector(try_alloc_slice(p, start, &items)?)))
}

/// Scans a `#{...}` set, whose opening delimiter is two bytes.
pub fn scan_set<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    let (items, offsets) = read_elements(p, 2, b'}')?;
    check_duplicates(&items, &offsets, false)?;
    Ok(Value::new(ValueKind::Set(try_alloc_slice(p, start, &items)?)))
}

pub fn scan_map<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    let (keys, values, key_offsets) = read_map_body(p, 1)?;
    check_duplicates(&keys, &key_offsets, true)?;
    Ok(Value::new(ValueKind::Map {
        keys: try_alloc_slice(p, start, &keys)?,
        values: try_alloc_slice(p, start, &values)?,
    }))
}

/// Copies `items` into the arena, reporting `out-of-memory` at
/// `offset` instead of aborting when the allocator is exhausted.
fn try_alloc_slice<'a, T: Copy>(p: &Parser<'a, '_>, offset: usize, items: &[T]) -> ReadResult<&'a [T]> {
    p.arena
        .try_alloc_slice_copy(items)
        .map_err(|_| error::out_of_memory("Arena allocation failed", offset))
}

fn check_duplicates(items: &[Value], offsets: &[usize], is_map: bool) -> ReadResult<()> {
    if let Some(i) = uniqueness::find_duplicate(items) {
        let offset = offsets[i];
        return Err(if is_map {
            error::duplicate_key(format!("Duplicate map key at index {}", i), offset)
        } else {
            error::duplicate_element(format!("Duplicate set element at index {}", i), offset)
        });
    }
    Ok(())
}

/// Reads elements up to `close`, after consuming `open_len` bytes of
/// opening delimiter. Shared by lists, vectors, and sets. Returns the
/// elements alongside the byte offset each one started at.
fn read_elements<'a>(
    p: &mut Parser<'a, '_>,
    open_len: usize,
    close: u8,
) -> ReadResult<(Vec<Value<'a>>, Vec<usize>)> {
    let start = p.cursor.position();
    p.enter_depth()?;
    p.cursor.advance(open_len);

    let mut items = Vec::new();
    let mut offsets = Vec::new();
    loop {
        skip_ws_comments(p);
        match p.cursor.peek() {
            None => {
                p.exit_depth();
                return Err(error::unexpected_eof("Unexpected end of input", start));
            }
            Some(b) if b == close => {
                p.cursor.advance(1);
                p.exit_depth();
                return Ok((items, offsets));
            }
            Some(b) if is_closing_delimiter(b) => {
                p.exit_depth();
                return Err(error::unmatched_delimiter("Unmatched closing delimiter", p.cursor.position()));
            }
            Some(_) => {
                let item_start = p.cursor.position();
                match p.read_value() {
                    Ok(v) => {
                        items.push(v);
                        offsets.push(item_start);
                    }
                    Err(e) => {
                        p.exit_depth();
                        return Err(e);
                    }
                }
            }
        }
    }
}

fn read_map_body<'a>(
    p: &mut Parser<'a, '_>,
    open_len: usize,
) -> ReadResult<(Vec<Value<'a>>, Vec<Value<'a>>, Vec<usize>)> {
    let start = p.cursor.position();
    p.enter_depth()?;
    p.cursor.advance(open_len);

    let mut forms = Vec::new();
    let mut form_offsets = Vec::new();
    loop {
        skip_ws_comments(p);
        match p.cursor.peek() {
            None => {
                p.exit_depth();
                return Err(error::unexpected_eof("Unexpected end of input", start));
            }
            Some(b'}') => {
                p.cursor.advance(1);
                p.exit_depth();
                break;
            }
            Some(b) if is_closing_delimiter(b) => {
                p.exit_depth();
                return Err(error::unmatched_delimiter("Unmatched closing delimiter", p.cursor.position()));
            }
            Some(_) => {
                let form_start = p.cursor.position();
                match p.read_value() {
                    Ok(v) => {
                        forms.push(v);
                        form_offsets.push(form_start);
                    }
                    Err(e) => {
                        p.exit_depth();
                        return Err(e);
                    }
                }
            }
        }
    }

    if forms.len() % 2 != 0 {
        return Err(error::invalid_map("Map requires even number of forms", start));
    }

    let mut keys = Vec::with_capacity(forms.len() / 2);
    let mut values = Vec::with_capacity(forms.len() / 2);
    let mut key_offsets = Vec::with_capacity(forms.len() / 2);
    for (pair, offset_pair) in forms.chunks_exact(2).zip(form_offsets.chunks_exact(2)) {
        keys.push(pair[0]);
        values.push(pair[1]);
        key_offsets.push(offset_pair[0]);
    }
    Ok((keys, values, key_offsets))
}

fn is_closing_delimiter(b: u8) -> bool {
    matches!(crate::charclass::class(b), Class::ListClose | Class::VectorClose | Class::MapClose)
}

fn skip_ws_comments(p: &mut Parser<'_, '_>) {
    // `read_value` already skips leading whitespace/comments; this
    // just lets the loop peek the next significant byte without
    // consuming a value yet.
    let pos = crate::simd::skip_whitespace(p.cursor.input(), p.cursor.position());
    p.cursor.advance(pos - p.cursor.position());
}
