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

//! Universal-invariant checks (§8) over randomly generated inputs.

use edn::equality::values_eq;
use edn::{read, Arena, ParseOptions};
use proptest::prelude::*;

fn parses_same_tree_twice(input: &[u8]) {
    let arena_a = Arena::new();
    let arena_b = Arena::new();
    let a = read(&arena_a, input, &ParseOptions::new());
    let b = read(&arena_b, input, &ParseOptions::new());
    match (a, b) {
        (Ok(da), Ok(db)) => assert!( values_eq(&da.root, &db.root) ),
        (Err(ea), Err(eb)) => assert_eq!( ea.kind, eb.kind ),
        (a, b) => panic!("non-deterministic parse: {:?} vs {:?}", a.is_ok(), b.is_ok()),
    }
}

proptest! {
    #[test]
    fn read_is_deterministic_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        parses_same_tree_twice(&bytes);
    }

    #[test]
    fn read_is_deterministic_on_integers(n in any::<i64>()) {
        let text = n.to_string();
        parses_same_tree_twice(text.as_bytes());
    }

    #[test]
    fn ratio_is_always_reduced_and_positive_denominator(
        numer in 1i64..10_000,
        denom in 1i64..10_000,
    ) {
        let arena = Arena::new();
        let input = format!("{}/{}", numer, denom);
        let doc = read(&arena, input.as_bytes(), &ParseOptions::new()).unwrap();
        match doc.root.kind {
            edn::ValueKind::Ratio { numer, denom } => {
                prop_assert!( denom > 0 );
                prop_assert_eq!( gcd(numer.unsigned_abs(), denom as u64), 1 );
            }
            edn::ValueKind::Int(_) => {} // collapsed to an integer, also valid
            other => prop_assert!(false, "unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn map_keys_are_pairwise_distinct(
        pairs in prop::collection::vec((0i64..20, 0i64..1000), 0..20),
    ) {
        let mut seen = std::collections::BTreeMap::new();
        for (k, v) in pairs {
            seen.insert(k, v);
        }
        let body: String = seen
            .iter()
            .map(|(k, v)| format!(":k{} {}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        let input = format!("{{{}}}", body);
        let arena = Arena::new();
        let doc = read(&arena, input.as_bytes(), &ParseOptions::new()).unwrap();
        let (keys, _) = doc.root.as_map().unwrap();
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                prop_assert!( !values_eq(&keys[i], &keys[j]) );
            }
        }
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
