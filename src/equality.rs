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

//! Structural equality, canonical ordering, and stable hashing over
//! the value tree — the primitives [`crate::uniqueness`] is built on.

use std::cmp::Ordering;

use crate::registry::external_types;
use crate::value::{Value, ValueKind};

/// A fixed rank used to order values of different kinds, and to
/// short-circuit equality between values that can never be equal.
fn rank(v: &Value) -> u8 {
    match v.kind {
        ValueKind::Nil => 0,
        ValueKind::Bool(_) => 1,
        ValueKind::Int(_) | ValueKind::BigInt { .. } => 2,
        ValueKind::Float(_) => 3,
        ValueKind::BigDec { .. } => 4,
        ValueKind::Ratio { .. } | ValueKind::BigRatio { .. } => 5,
        ValueKind::Character(_) => 6,
        ValueKind::String(_) => 7,
        ValueKind::Symbol(_) => 8,
        ValueKind::Keyword(_) => 9,
        ValueKind::List(_) => 10,
        ValueKind::Vector(_) => 11,
        ValueKind::Set(_) => 12,
        ValueKind::Map { .. } => 13,
        ValueKind::Tagged { .. } => 14,
        ValueKind::External(_) => 15,
    }
}

fn is_numeric(v: &Value) -> bool {
    matches!(
        v.kind,
        ValueKind::Int(_)
            | ValueKind::BigInt { .. }
            | ValueKind::Float(_)
            | ValueKind::BigDec { .. }
            | ValueKind::Ratio { .. }
            | ValueKind::BigRatio { .. }
    )
}

/// Structural equality (§4.14). Integers compare across `int`/
/// `big-int` numerically; floats compare only to floats (`NaN` never
/// equals itself); ratios compare across `ratio`/`big-ratio` by cross
/// product (Open Question OQ-1, resolved in favour of numeric
/// equality).
pub fn values_eq(a: &Value, b: &Value) -> bool {
    use ValueKind::*;

    match (a.kind, b.kind) {
        (Nil, Nil) => true,
        (Bool(x), Bool(y)) => x == y,
        (Int(x), Int(y)) => x == y,
        (Int(x), BigInt { digits, radix, negative }) | (BigInt { digits, radix, negative }, Int(x)) => {
            big_int_eq_i64(digits.raw, radix, negative, x)
        }
        (BigInt { digits: d1, radix: r1, negative: n1 }, BigInt { digits: d2, radix: r2, negative: n2 }) => {
            big_int_eq_big_int(d1.raw, r1, n1, d2.raw, r2, n2)
        }
        (Float(x), Float(y)) => x == y,
        (BigDec { digits: d1, negative: n1 }, BigDec { digits: d2, negative: n2 }) => {
            n1 == n2 && strip_seps(d1.raw) == strip_seps(d2.raw)
        }
        (Ratio { numer: n1, denom: d1 }, Ratio { numer: n2, denom: d2 }) => {
            (n1 as i128) * (d2 as i128) == (n2 as i128) * (d1 as i128)
        }
        (Ratio { numer, denom }, BigRatio { numer: bn, denom: bd })
        | (BigRatio { numer: bn, denom: bd }, Ratio { numer, denom }) => {
            ratio_eq_big_ratio(numer, denom, bn.raw, bd.raw)
        }
        (BigRatio { numer: n1, denom: d1 }, BigRatio { numer: n2, denom: d2 }) => {
            strip_seps(n1.raw) == strip_seps(n2.raw) && strip_seps(d1.raw) == strip_seps(d2.raw)
        }
        (Character(x), Character(y)) => x == y,
        (String(x), String(y)) => x.raw == y.raw,
        (Symbol(x), Symbol(y)) => x == y,
        (Keyword(x), Keyword(y)) => x == y,
        (List(xs), List(ys)) | (Vector(xs), Vector(ys)) => seq_eq(xs, ys),
        (Set(xs), Set(ys)) => set_eq(xs, ys),
        (
            Map { keys: k1, values: v1 },
            Map { keys: k2, values: v2 },
        ) => map_eq(k1, v1, k2, v2),
        (Tagged { tag: t1, inner: i1 }, Tagged { tag: t2, inner: i2 }) => t1 == t2 && values_eq(i1, i2),
        (External(e1), External(e2)) => external_types().eq(e1.type_id, e1.ptr, e2.ptr),
        _ => false,
    }
}

fn strip_seps(s: &str) -> String {
    s.chars().filter(|&c| c != '_').collect()
}

fn big_int_eq_i64(digits: &str, radix: u32, negative: bool, n: i64) -> bool {
    match i64::from_str_radix(&strip_seps(digits), radix) {
        Ok(v) => (if negative { -v } else { v }) == n,
        Err(_) => false,
    }
}

fn big_int_eq_big_int(d1: &str, r1: u32, n1: bool, d2: &str, r2: u32, n2: bool) -> bool {
    // Compare via i128 when both fit; otherwise fall back to
    // canonical-string comparison (equal iff same sign and the same
    // digit sequence once both are expressed in the same radix).
    let a = i128::from_str_radix(&strip_seps(d1), r1);
    let b = i128::from_str_radix(&strip_seps(d2), r2);
    match (a, b) {
        (Ok(a), Ok(b)) => (if n1 { -a } else { a }) == (if n2 { -b } else { b }),
        _ => n1 == n2 && r1 == r2 && strip_seps(d1).trim_start_matches('0') == strip_seps(d2).trim_start_matches('0'),
    }
}

fn ratio_eq_big_ratio(numer: i64, denom: i64, bn: &str, bd: &str) -> bool {
    let bn_v = i128::from_str_radix(&strip_seps(bn), 10);
    let bd_v = i128::from_str_radix(&strip_seps(bd), 10);
    match (bn_v, bd_v) {
        (Ok(bn), Ok(bd)) => (numer as i128) * bd == bn * (denom as i128),
        _ => false,
    }
}

fn seq_eq(xs: &[Value], ys: &[Value]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(a, b)| values_eq(a, b))
}

fn set_eq(xs: &[Value], ys: &[Value]) -> bool {
    xs.len() == ys.len() && xs.iter().all(|x| ys.iter().any(|y| values_eq(x, y)))
}

fn map_eq(k1: &[Value], v1: &[Value], k2: &[Value], v2: &[Value]) -> bool {
    if k1.len() != k2.len() {
        return false;
    }
    k1.iter().zip(v1.iter()).all(|(k, v)| {
        k2.iter()
            .zip(v2.iter())
            .find(|(k2, _)| values_eq(k, k2))
            .is_some_and(|(_, v2)| values_eq(v, v2))
    })
}

/// Canonical total ordering, used by the sort-based uniqueness
/// strategy (§4.15). Values of different kinds order by [`rank`];
/// same-kind values order by their natural comparator. This is a
/// total order for the sort's purposes, not a claim about EDN
/// semantics beyond "equal structurally iff adjacent after sorting".
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    use ValueKind::*;

    if is_numeric(a) && is_numeric(b) {
        if values_eq(a, b) {
            return Ordering::Equal;
        }
        // Structurally distinct (values_eq is false), so a magnitude
        // tie (e.g. Int(1) vs Float(1.0)) must not report Equal: fall
        // back to rank, same as the non-numeric kinds below.
        return numeric_magnitude(a)
            .partial_cmp(&numeric_magnitude(b))
            .unwrap_or(Ordering::Equal)
            .then_with(|| rank(a).cmp(&rank(b)));
    }

    let (ra, rb) = (rank(a), rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }

    match (a.kind, b.kind) {
        (Character(x), Character(y)) => x.cmp(&y),
        (String(x), String(y)) => x.raw.cmp(y.raw),
        (Symbol(x), Symbol(y)) | (Keyword(x), Keyword(y)) => {
            (x.namespace, x.name).cmp(&(y.namespace, y.name))
        }
        (List(xs), List(ys)) | (Vector(xs), Vector(ys)) => compare_seq(xs, ys),
        (Set(xs), Set(ys)) => xs.len().cmp(&ys.len()),
        (Map { keys: k1, .. }, Map { keys: k2, .. }) => k1.len().cmp(&k2.len()),
        (Tagged { tag: t1, inner: i1 }, Tagged { tag: t2, inner: i2 }) => {
            t1.cmp(t2).then_with(|| compare_values(i1, i2))
        }
        _ => Ordering::Equal,
    }
}

fn compare_seq(xs: &[Value], ys: &[Value]) -> Ordering {
    for (x, y) in xs.iter().zip(ys.iter()) {
        let c = compare_values(x, y);
        if c != Ordering::Equal {
            return c;
        }
    }
    xs.len().cmp(&ys.len())
}

fn numeric_magnitude(v: &Value) -> f64 {
    match v.kind {
        ValueKind::Int(n) => n as f64,
        ValueKind::Float(x) => x,
        ValueKind::Ratio { numer, denom } => numer as f64 / denom as f64,
        ValueKind::BigInt { digits, radix, negative } => {
            let mag = i128::from_str_radix(&strip_seps(digits.raw), radix).unwrap_or(0) as f64;
            if negative { -mag } else { mag }
        }
        ValueKind::BigDec { digits, negative } => {
            let mag: f64 = strip_seps(digits.raw).parse().unwrap_or(0.0);
            if negative { -mag } else { mag }
        }
        ValueKind::BigRatio { numer, denom } => {
            let n: f64 = strip_seps(numer.raw).parse().unwrap_or(0.0);
            let d: f64 = strip_seps(denom.raw).parse().unwrap_or(1.0);
            n / d
        }
        _ => 0.0,
    }
}

/// A small, stable 64-bit mix (FNV-1a), used instead of
/// [`std::hash::Hash`]/`SipHash` because the cache on [`Value`] needs
/// a plain deterministic `u64`, not a keyed hasher.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut h = OFFSET;
    for &b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(PRIME);
    }
    h
}

/// Computes the structural hash of `v`, consistent with
/// [`values_eq`]: `values_eq(a, b)` implies `hash_value(a) ==
/// hash_value(b)`.
pub fn hash_value(v: &Value) -> u64 {
    use ValueKind::*;

    match v.kind {
        Nil => fnv1a(b"nil"),
        Bool(b) => fnv1a(if b { b"true" } else { b"false" }),
        Int(n) => fnv1a(&n.to_le_bytes()),
        BigInt { digits, radix, negative } => match i128::from_str_radix(&strip_seps(digits.raw), radix) {
            Ok(n) => fnv1a(&(if negative { -n } else { n }).to_le_bytes()),
            Err(_) => fnv1a(strip_seps(digits.raw).as_bytes()),
        },
        Float(x) => {
            if x == 0.0 {
                fnv1a(&0f64.to_le_bytes())
            } else {
                fnv1a(&x.to_le_bytes())
            }
        }
        BigDec { digits, .. } => fnv1a(strip_seps(digits.raw).as_bytes()),
        Ratio { numer, denom } => {
            let mag = numer as f64 / denom as f64;
            fnv1a(&mag.to_le_bytes())
        }
        BigRatio { numer, denom } => {
            let n: f64 = strip_seps(numer.raw).parse().unwrap_or(0.0);
            let d: f64 = strip_seps(denom.raw).parse().unwrap_or(1.0);
            fnv1a(&(n / d).to_le_bytes())
        }
        Character(c) => fnv1a(&(c as u32).to_le_bytes()),
        String(s) => fnv1a(s.raw.as_bytes()),
        Symbol(id) | Keyword(id) => {
            let mut bytes = Vec::with_capacity(id.name.len() + 2);
            if let Some(ns) = id.namespace {
                bytes.extend_from_slice(ns.as_bytes());
            }
            bytes.push(b'/');
            bytes.extend_from_slice(id.name.as_bytes());
            fnv1a(&bytes)
        }
        List(xs) | Vector(xs) => hash_seq(xs),
        Set(xs) => xs.iter().fold(0u64, |acc, x| acc ^ hash_value(x)),
        Map { keys, values } => keys
            .iter()
            .zip(values.iter())
            .fold(0u64, |acc, (k, v)| acc ^ (hash_value(k).wrapping_mul(31) ^ hash_value(v))),
        Tagged { tag, inner } => fnv1a(tag.as_bytes()) ^ hash_value(inner),
        External(e) => external_types().hash(e.type_id, e.ptr),
    }
}

fn hash_seq(xs: &[Value]) -> u64 {
    let mut h = 0xcbf29ce484222325u64;
    for x in xs {
        h = h.wrapping_mul(0x100000001b3) ^ hash_value(x);
    }
    h
}
