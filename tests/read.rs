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

//! Black-box scenario tests exercising the public `read` entry point
//! end to end, one case per collection kind, extension, and error
//! path.

use edn::registry::ReaderRegistry;
use edn::{read, Arena, DefaultReaderMode, ErrorKind, ParseOptions, ValueKind};

#[test]
fn map_with_two_entries() {
    let arena = Arena::new();
    let doc = read(&arena, b"{:a 1, :b 2}", &ParseOptions::new()).unwrap();
    let (keys, values) = doc.root.as_map().unwrap();
    assert_eq!( keys.len(), 2 );
    assert_eq!( keys[0].as_keyword().unwrap().name, "a" );
    assert_eq!( values[0].as_int(), Some(1) );
    assert_eq!( keys[1].as_keyword().unwrap().name, "b" );
    assert_eq!( values[1].as_int(), Some(2) );
}

#[test]
fn set_of_three_integers() {
    let arena = Arena::new();
    let doc = read(&arena, b"#{1 2 3}", &ParseOptions::new()).unwrap();
    assert_eq!( doc.root.as_set().unwrap().len(), 3 );
}

#[test]
fn discard_drops_leading_form() {
    let arena = Arena::new();
    let doc = read(&arena, b"#_42 :kept", &ParseOptions::new()).unwrap();
    assert_eq!( doc.root.as_keyword().unwrap().name, "kept" );
}

#[test]
fn unknown_tag_passes_through() {
    let arena = Arena::new();
    let doc = read(
        &arena,
        b"#inst \"2024-01-01T00:00:00Z\"",
        &ParseOptions::new(),
    )
    .unwrap();
    match doc.root.kind {
        ValueKind::Tagged { tag, inner } => {
            assert_eq!( tag, "inst" );
            assert_eq!( inner.as_str(&arena).unwrap().unwrap(), "2024-01-01T00:00:00Z" );
        }
        other => panic!("expected a tagged value, got {:?}", other),
    }
}

#[test]
fn registered_reader_reshapes_tagged_literal() {
    let mut readers = ReaderRegistry::new();
    readers.register("inst", |v, arena| {
        let text = v
            .as_str(arena)
            .and_then(|r| r.ok())
            .ok_or_else(|| "#inst requires a string".to_string())?;
        Ok(edn::Value::new(ValueKind::Keyword(edn::Ident::new(
            Some("inst"),
            arena.alloc_str(text),
        ))))
    });
    let arena = Arena::new();
    let opts = ParseOptions::new().with_readers(&readers);
    let doc = read(&arena, b"#inst \"2024-01-01T00:00:00Z\"", &opts).unwrap();
    let kw = doc.root.as_keyword().unwrap();
    assert_eq!( kw.namespace, Some("inst") );
    assert_eq!( kw.name, "2024-01-01T00:00:00Z" );
}

#[test]
fn truncated_vector_is_unexpected_eof_at_last_byte() {
    let arena = Arena::new();
    let err = read(&arena, b"[1 2", &ParseOptions::new()).unwrap_err();
    assert_eq!( err.kind, ErrorKind::UnexpectedEof );
    assert_eq!( err.location.line, 1 );
}

#[test]
fn zero_denominator_ratio_is_invalid_number() {
    let arena = Arena::new();
    let err = read(&arena, b"1/0", &ParseOptions::new()).unwrap_err();
    assert_eq!( err.kind, ErrorKind::InvalidNumber );
}

#[test]
fn symbolic_nan_is_actually_nan() {
    let arena = Arena::new();
    let doc = read(&arena, b"##NaN", &ParseOptions::new()).unwrap();
    match doc.root.kind {
        ValueKind::Float(f) => assert!( f.is_nan() ),
        other => panic!("expected a float, got {:?}", other),
    }
}

#[test]
fn text_block_strips_leading_whitespace_prefix() {
    let arena = Arena::new();
    let input = "\"\"\"\n   SELECT *\n     FROM t\n   \"\"\"";
    let doc = read(&arena, input.as_bytes(), &ParseOptions::new()).unwrap();
    let s = doc.root.as_str(&arena).unwrap().unwrap();
    assert_eq!( s, "SELECT *\n  FROM t\n" );
}

#[test]
fn duplicate_map_key_is_rejected() {
    let arena = Arena::new();
    let err = read(&arena, b"{:a 1 :a 2}", &ParseOptions::new()).unwrap_err();
    assert_eq!( err.kind, ErrorKind::DuplicateKey );
}

#[test]
fn discard_never_invokes_a_registered_reader() {
    let mut readers = ReaderRegistry::new();
    readers.register("boom", |_v, _arena| {
        Err("must not be called".to_string())
    });
    let arena = Arena::new();
    let opts = ParseOptions::new().with_readers(&readers);
    let doc = read(&arena, b"#_ #boom 1 2", &opts).unwrap();
    assert_eq!( doc.root.as_int(), Some(2) );
}

#[test]
fn unknown_tag_in_error_mode_fails() {
    let arena = Arena::new();
    let opts = ParseOptions::new().with_default_mode(DefaultReaderMode::Error);
    let err = read(&arena, b"#point [1 2]", &opts).unwrap_err();
    assert_eq!( err.kind, ErrorKind::UnknownTag );
}

#[test]
fn stacked_metadata_attaches_to_the_innermost_form() {
    let arena = Arena::new();
    let doc = read(&arena, b"^:private [1 2 3]", &ParseOptions::new()).unwrap();
    let (keys, values) = doc.root.meta.unwrap().as_map().unwrap();
    assert_eq!( keys[0].as_keyword().unwrap().name, "private" );
    assert_eq!( values[0].as_bool(), Some(true) );
}

#[test]
fn namespaced_map_rewrites_bare_keyword_keys() {
    let arena = Arena::new();
    let doc = read(&arena, b"#:user{:name \"x\" :age 9}", &ParseOptions::new()).unwrap();
    let (keys, _) = doc.root.as_map().unwrap();
    assert_eq!( keys[0].as_keyword().unwrap().namespace, Some("user") );
}

#[test]
fn depth_exceeded_on_deeply_nested_vectors() {
    let arena = Arena::new();
    let input = "[".repeat(10);
    let opts = ParseOptions::new().with_max_depth(4);
    let err = read(&arena, input.as_bytes(), &opts).unwrap_err();
    assert_eq!( err.kind, ErrorKind::DepthExceeded );
}
