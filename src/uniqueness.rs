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

//! Duplicate detection for set elements and map keys (§4.15).
//!
//! Three strategies, chosen by size: quadratic for small
//! collections, a sort-then-scan pass for medium ones, and an
//! open-addressed hash table for large ones. All three must agree on
//! whether a duplicate exists.

use crate::equality::{compare_values, hash_value, values_eq};
use crate::value::Value;

const QUADRATIC_LIMIT: usize = 16;
const SORT_LIMIT: usize = 1000;

/// Returns the index of the first element that duplicates an earlier
/// one, or `None` if all elements are pairwise distinct.
pub fn find_duplicate(items: &[Value]) -> Option<usize> {
    if items.len() <= QUADRATIC_LIMIT {
        find_duplicate_quadratic(items)
    } else if items.len() <= SORT_LIMIT {
        find_duplicate_sorted(items)
    } else {
        find_duplicate_hashed(items)
    }
}

fn find_duplicate_quadratic(items: &[Value]) -> Option<usize> {
    for i in 1..items.len() {
        for j in 0..i {
            if values_eq(&items[i], &items[j]) {
                return Some(i);
            }
        }
    }
    None
}

fn find_duplicate_sorted(items: &[Value]) -> Option<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| compare_values(&items[a], &items[b]));

    for w in order.windows(2) {
        let (a, b) = (w[0], w[1]);
        if values_eq(&items[a], &items[b]) {
            return Some(a.max(b));
        }
    }
    None
}

fn find_duplicate_hashed(items: &[Value]) -> Option<usize> {
    let table_size = (items.len() as f64 / 0.7).ceil() as usize;
    let table_size = table_size.next_power_of_two().max(1);
    let mask = table_size - 1;

    let mut slots: Vec<Option<usize>> = vec![None; table_size];

    for (i, item) in items.iter().enumerate() {
        let mut idx = (hash_value(item) as usize) & mask;
        loop {
            match slots[idx] {
                None => {
                    slots[idx] = Some(i);
                    break;
                }
                Some(j) if values_eq(&items[j], item) => return Some(i),
                Some(_) => idx = (idx + 1) & mask,
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn ints(xs: &[i64]) -> Vec<Value<'static>> {
        xs.iter().map(|&n| Value::new(ValueKind::Int(n))).collect()
    }

    #[test]
    fn quadratic_tier_detects_duplicate() {
        let items = ints(&[1, 2, 3, 2]);
        assert_eq!( find_duplicate(&items), Some(3) );
    }

    #[test]
    fn quadratic_tier_all_unique() {
        let items = ints(&[1, 2, 3, 4]);
        assert_eq!( find_duplicate(&items), None );
    }

    #[test]
    fn sorted_tier_detects_duplicate() {
        let mut xs: Vec<i64> = (0..200).collect();
        xs.push(50);
        let items = ints(&xs);
        assert!( find_duplicate(&items).is_some() );
    }

    #[test]
    fn sorted_tier_all_unique() {
        let xs: Vec<i64> = (0..200).collect();
        let items = ints(&xs);
        assert_eq!( find_duplicate(&items), None );
    }

    #[test]
    fn sorted_tier_detects_duplicate_separated_by_same_magnitude_float() {
        // Regression: a true Int duplicate separated from its twin by
        // a same-magnitude Float must still be found after sorting —
        // Int(1) and Float(1.0) are distinct (§4.14) and must not
        // collapse to `Ordering::Equal` in the sort comparator.
        let xs: Vec<i64> = (0..200).collect();
        let mut items = ints(&xs);
        items.push(Value::new(ValueKind::Float(1.0)));
        items.push(Value::new(ValueKind::Int(1)));
        assert!( find_duplicate(&items).is_some() );
    }

    #[test]
    fn hashed_tier_detects_duplicate() {
        let mut xs: Vec<i64> = (0..2000).collect();
        xs.push(777);
        let items = ints(&xs);
        assert!( find_duplicate(&items).is_some() );
    }

    #[test]
    fn hashed_tier_all_unique() {
        let xs: Vec<i64> = (0..2000).collect();
        let items = ints(&xs);
        assert_eq!( find_duplicate(&items), None );
    }
}
