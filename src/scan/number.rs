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

//! Number scanning (§4.5): radix and decimal forms, `N`/`M` suffixes,
//! ratio reduction, and overflow fallback to the big-numeric variants.

use crate::charclass;
use crate::error::{self, ReadResult};
use crate::parser::Parser;
use crate::value::{Digits, Value, ValueKind};

/// Scans a number starting at the cursor, which may be positioned on
/// a sign or a digit.
pub fn scan<'a>(p: &mut Parser<'a, '_>) -> ReadResult<Value<'a>> {
    let start = p.cursor.position();
    let input = p.cursor.input();

    let negative = match input.get(start) {
        Some(b'-') => true,
        Some(b'+') => false,
        _ => false,
    };
    let digits_start = if matches!(input.get(start), Some(b'+') | Some(b'-')) { start + 1 } else { start };

    if let Some(end) = explicit_radix_prefix(input, digits_start) {
        let (radix, body_start) = end;
        let body_end = scan_digit_run(input, body_start, radix, p.digit_separators, start)?;
        return finish_integer(p, start, body_start, body_end, radix, negative);
    }

    let int_end = scan_digit_run(input, digits_start, 10, p.digit_separators, start)?;

    if matches!(input.get(int_end), Some(b'r') | Some(b'R')) {
        let radix_text = cleaned_ascii(&input[digits_start..int_end]);
        let radix: u32 = radix_text
            .parse()
            .map_err(|_| error::invalid_number("Invalid radix", start))?;
        if !(2..=36).contains(&radix) {
            return Err(error::invalid_number("Radix must be between 2 and 36", start));
        }
        let body_start = int_end + 1;
        let body_end = scan_digit_run(input, body_start, radix, p.digit_separators, start)?;
        return finish_integer(p, start, body_start, body_end, radix, negative);
    }

    // Decimal form: optional fraction, optional exponent, optional suffix.
    let mut end = int_end;
    let mut has_frac = false;
    if input.get(end) == Some(&b'.') && input.get(end + 1).is_some_and(u8::is_ascii_digit) {
        has_frac = true;
        end = scan_digit_run(input, end + 1, 10, p.digit_separators, start)?;
    }

    let mut has_exp = false;
    if matches!(input.get(end), Some(b'e') | Some(b'E')) {
        let mut e_pos = end + 1;
        if matches!(input.get(e_pos), Some(b'+') | Some(b'-')) {
            e_pos += 1;
        }
        end = scan_digit_run(input, e_pos, 10, p.digit_separators, start)?;
        has_exp = true;
    }

    if has_frac || has_exp {
        let is_m = input.get(end) == Some(&b'M');
        if is_m {
            end += 1;
        }
        if !charclass::is_delimiter_or_eof(input.get(end).copied()) {
            return Err(error::invalid_number(
                "Number must be followed by whitespace or delimiter",
                end,
            ));
        }

        let value = if is_m {
            ValueKind::BigDec {
                digits: Digits::new(alloc_slice(p, start, &input[digits_start..end - 1])?),
                negative,
            }
        } else {
            let text = cleaned_ascii(&input[digits_start..end]);
            let magnitude: f64 = text
                .parse()
                .map_err(|_| error::invalid_number("Malformed decimal number", start))?;
            ValueKind::Float(if negative { -magnitude } else { magnitude })
        };

        p.cursor.advance(end - start);
        return Ok(Value::new(value));
    }

    finish_integer(p, start, digits_start, end, 10, negative)
}

/// Recognises `0x`/`0X`, `0o`/`0O`, `0b`/`0B` prefixes, and the bare
/// `0` + octal-digits form (`'0' [oO]? octal-digits`). Returns the
/// radix and the offset of the first digit after the prefix.
fn explicit_radix_prefix(input: &[u8], pos: usize) -> Option<(u32, usize)> {
    if input.get(pos) != Some(&b'0') {
        return None;
    }
    match input.get(pos + 1) {
        Some(b'x') | Some(b'X') => return Some((16, pos + 2)),
        Some(b'o') | Some(b'O') => return Some((8, pos + 2)),
        Some(b'b') | Some(b'B') => return Some((2, pos + 2)),
        _ => {}
    }
    bare_octal_prefix(input, pos)
}

/// A bare leading `0` followed directly by digits is octal only when
/// unambiguous: every digit in the run must be in `0..=7`, and the run
/// must not actually be the integer part of a decimal float or a
/// custom-radix form (`0123.5`, `036r...`).
fn bare_octal_prefix(input: &[u8], pos: usize) -> Option<(u32, usize)> {
    if !matches!(input.get(pos + 1), Some(b'0'..=b'7')) {
        return None;
    }
    let mut j = pos + 1;
    let mut all_octal = true;
    while matches!(input.get(j), Some(b'0'..=b'9') | Some(b'_')) {
        if matches!(input.get(j), Some(b'8') | Some(b'9')) {
            all_octal = false;
        }
        j += 1;
    }
    let is_float_or_radix = matches!(input.get(j), Some(b'r') | Some(b'R'))
        || matches!(input.get(j), Some(b'e') | Some(b'E'))
        || (input.get(j) == Some(&b'.') && input.get(j + 1).is_some_and(u8::is_ascii_digit));
    if all_octal && !is_float_or_radix {
        Some((8, pos + 1))
    } else {
        None
    }
}

/// Scans a run of digits valid in `radix`, with `_` separators
/// permitted between digits (never leading, trailing, or adjacent)
/// when `allow_sep` is set.
fn scan_digit_run(input: &[u8], start: usize, radix: u32, allow_sep: bool, token_start: usize) -> ReadResult<usize> {
    let mut i = start;
    let mut saw_digit = false;
    loop {
        match input.get(i) {
            Some(&b) if (b as char).is_digit(radix) => {
                i += 1;
                saw_digit = true;
            }
            Some(&b'_') if allow_sep && saw_digit => {
                let next_is_digit = input.get(i + 1).is_some_and(|&b2| (b2 as char).is_digit(radix));
                if !next_is_digit {
                    break;
                }
                i += 1;
            }
            _ => break,
        }
    }
    if !saw_digit {
        return Err(error::invalid_number("Expected digit", token_start));
    }
    Ok(i)
}

fn cleaned_ascii(raw: &[u8]) -> String {
    raw.iter().copied().filter(|&b| b != b'_').map(char::from).collect()
}

fn alloc_slice<'a>(p: &Parser<'a, '_>, offset: usize, raw: &[u8]) -> ReadResult<&'a str> {
    // ASCII digit/separator spans are always valid UTF-8.
    p.arena
        .try_alloc_str(std::str::from_utf8(raw).unwrap())
        .map_err(|_| error::out_of_memory("Arena allocation failed", offset))
}

fn check_terminator(p: &Parser<'_, '_>, end: usize) -> ReadResult<()> {
    let b = p.cursor.input().get(end).copied();
    if charclass::is_delimiter_or_eof(b) || (p.ratios && b == Some(b'/')) {
        Ok(())
    } else {
        Err(error::invalid_number(
            "Number must be followed by whitespace or delimiter",
            end,
        ))
    }
}

/// Finishes classifying an integer-form literal (`[digits_start,
/// digits_end)` in `radix`), handling the `N`/`M` suffixes that can
/// follow any integer form and the ratio continuation.
fn finish_integer<'a>(
    p: &mut Parser<'a, '_>,
    start: usize,
    digits_start: usize,
    digits_end: usize,
    radix: u32,
    negative: bool,
) -> ReadResult<Value<'a>> {
    let input = p.cursor.input();
    let mut end = digits_end;

    let is_n = input.get(end) == Some(&b'N');
    let is_m = input.get(end) == Some(&b'M');
    if is_n || is_m {
        end += 1;
    }

    if is_m {
        check_terminator(p, end)?;
        p.cursor.advance(end - start);
        return Ok(Value::new(ValueKind::BigDec {
            digits: Digits::new(alloc_slice(p, start, &input[digits_start..digits_end])?),
            negative,
        }));
    }

    if is_n {
        check_terminator(p, end)?;
        p.cursor.advance(end - start);
        return Ok(Value::new(ValueKind::BigInt {
            digits: Digits::new(alloc_slice(p, start, &input[digits_start..digits_end])?),
            radix,
            negative,
        }));
    }

    if p.ratios && input.get(end) == Some(&b'/') {
        return finish_ratio(p, start, digits_start, digits_end, radix, negative);
    }

    check_terminator(p, end)?;
    p.cursor.advance(end - start);

    let magnitude_text = cleaned_ascii(&input[digits_start..digits_end]);
    match to_signed(&magnitude_text, radix, negative) {
        Some(n) => Ok(Value::new(ValueKind::Int(n))),
        None => Ok(Value::new(ValueKind::BigInt {
            digits: Digits::new(alloc_slice(p, start, &input[digits_start..digits_end])?),
            radix,
            negative,
        })),
    }
}

/// Parses `3/4` once the numerator and a `/` have been scanned.
/// Denominators are always base 10, matching the `p/q` grammar shape.
fn finish_ratio<'a>(
    p: &mut Parser<'a, '_>,
    start: usize,
    numer_start: usize,
    numer_end: usize,
    numer_radix: u32,
    numer_negative: bool,
) -> ReadResult<Value<'a>> {
    let input = p.cursor.input();
    let denom_start = numer_end + 1;
    let denom_end = scan_digit_run(input, denom_start, 10, p.digit_separators, start)?;

    check_terminator(p, denom_end)?;
    p.cursor.advance(denom_end - start);

    let numer_text = cleaned_ascii(&input[numer_start..numer_end]);
    let denom_text = cleaned_ascii(&input[denom_start..denom_end]);

    let numer_fits = to_signed(&numer_text, numer_radix, numer_negative);
    let denom_fits = to_signed(&denom_text, 10, false);

    match (numer_fits, denom_fits) {
        (Some(numer), Some(denom)) => {
            if denom <= 0 {
                return Err(error::invalid_number("Ratio denominator must be positive", start));
            }
            let g = gcd(numer.unsigned_abs(), denom as u64).max(1);
            let numer = numer / g as i64;
            let denom = denom / g as i64;
            if numer == 0 {
                Ok(Value::new(ValueKind::Int(0)))
            } else if denom == 1 {
                Ok(Value::new(ValueKind::Int(numer)))
            } else {
                Ok(Value::new(ValueKind::Ratio { numer, denom }))
            }
        }
        _ => Ok(Value::new(ValueKind::BigRatio {
            numer: Digits::new(alloc_slice(p, start, &input[numer_start..numer_end])?),
            denom: Digits::new(alloc_slice(p, start, &input[denom_start..denom_end])?),
        })),
    }
}

fn to_signed(cleaned_digits: &str, radix: u32, negative: bool) -> Option<i64> {
    let magnitude = u64::from_str_radix(cleaned_digits, radix).ok()?;
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            None
        } else if magnitude == i64::MAX as u64 + 1 {
            Some(i64::MIN)
        } else {
            Some(-(magnitude as i64))
        }
    } else if magnitude > i64::MAX as u64 {
        None
    } else {
        Some(magnitude as i64)
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
