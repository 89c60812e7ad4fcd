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

//! Vectorized byte scanning with an authoritative scalar fallback.
//!
//! Every public function here has a scalar definition that is the
//! single source of truth for correctness; the vectorized bodies
//! (behind runtime CPU-feature detection) exist purely to go faster
//! and must agree with the scalar body bit-for-bit, which the test
//! module checks directly.

#![allow(unsafe_code)]

use crate::charclass::is_delimiter;

/// CPU features detected at runtime, used to select a scanning body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuFeatures {
    pub sse2: bool,
}

#[cfg(target_arch = "x86_64")]
pub fn detect_cpu_features() -> CpuFeatures {
    CpuFeatures { sse2: is_x86_feature_detected!("sse2") }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn detect_cpu_features() -> CpuFeatures {
    CpuFeatures { sse2: false }
}

fn features() -> CpuFeatures {
    use std::sync::OnceLock;
    static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();
    *FEATURES.get_or_init(detect_cpu_features)
}

// ---------------------------------------------------------------------------
// Whitespace skipping
// ---------------------------------------------------------------------------

#[inline]
fn is_ws_byte(b: u8) -> bool {
    matches!(b, b' ' | b',' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C | 0x1C..=0x1F)
}

/// Skips whitespace and `;` line comments starting at `start`, and
/// returns the offset of the first byte that is neither.
pub fn skip_whitespace(input: &[u8], start: usize) -> usize {
    let mut i = start;
    loop {
        i = skip_whitespace_run(input, i);
        if i < input.len() && input[i] == b';' {
            while i < input.len() && input[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        return i;
    }
}

fn skip_whitespace_run(input: &[u8], start: usize) -> usize {
    #[cfg(target_arch = "x86_64")]
    if features().sse2 {
        return unsafe { skip_whitespace_run_sse2(input, start) };
    }
    skip_whitespace_run_scalar(input, start)
}

fn skip_whitespace_run_scalar(input: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < input.len() && is_ws_byte(input[i]) {
        i += 1;
    }
    i
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn skip_whitespace_run_sse2(input: &[u8], start: usize) -> usize {
    use std::arch::x86_64::*;

    let mut i = start;
    let len = input.len();

    while i + 16 <= len {
        let chunk = _mm_loadu_si128(input.as_ptr().add(i) as *const __m128i);

        let eq_space = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b' ' as i8));
        let eq_comma = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b',' as i8));
        let eq_tab = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\t' as i8));
        let eq_lf = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\n' as i8));
        let eq_cr = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\r' as i8));

        let any = _mm_or_si128(
            _mm_or_si128(eq_space, eq_comma),
            _mm_or_si128(_mm_or_si128(eq_tab, eq_lf), eq_cr),
        );
        let mask = _mm_movemask_epi8(any) as u32;

        if mask == 0xFFFF {
            i += 16;
            continue;
        }

        // Some byte in this chunk is not one of the five common
        // whitespace bytes (could be non-whitespace, or one of the
        // rarer control codes); finish the chunk scalar.
        return skip_whitespace_run_scalar(input, i);
    }

    skip_whitespace_run_scalar(input, i)
}

// ---------------------------------------------------------------------------
// String scanning
// ---------------------------------------------------------------------------

/// Scans forward from `start` (just past the opening `"`) for the
/// closing, unescaped `"`. Returns `(offset_of_quote_or_len,
/// has_backslash)`; `has_backslash` is set if any `\` byte was seen
/// before the close (or before EOF).
pub fn find_quote(input: &[u8], start: usize) -> (usize, bool) {
    #[cfg(target_arch = "x86_64")]
    if features().sse2 {
        return unsafe { find_quote_sse2(input, start) };
    }
    find_quote_scalar(input, start)
}

fn find_quote_scalar(input: &[u8], start: usize) -> (usize, bool) {
    let mut i = start;
    let mut has_backslash = false;
    while i < input.len() {
        match input[i] {
            b'"' => return (i, has_backslash),
            b'\\' => {
                has_backslash = true;
                i += 2; // skip the escaped byte too; decoding validates it later
            }
            _ => i += 1,
        }
    }
    (input.len(), has_backslash)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn find_quote_sse2(input: &[u8], start: usize) -> (usize, bool) {
    use std::arch::x86_64::*;

    let mut i = start;
    let len = input.len();
    let mut has_backslash = false;

    while i + 16 <= len {
        let chunk = _mm_loadu_si128(input.as_ptr().add(i) as *const __m128i);
        let eq_quote = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'"' as i8));
        let eq_bslash = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\\' as i8));
        let any = _mm_or_si128(eq_quote, eq_bslash);
        let mask = _mm_movemask_epi8(any) as u32;

        if mask == 0 {
            i += 16;
            continue;
        }

        // A quote or backslash is present in this chunk; resolve the
        // exact position, including escape-pair skipping, scalar.
        let (pos, rest_has_backslash) = find_quote_scalar(input, i);
        return (pos, has_backslash || rest_has_backslash);
    }

    let (pos, rest_has_backslash) = find_quote_scalar(input, i);
    (pos, has_backslash || rest_has_backslash)
}

// ---------------------------------------------------------------------------
// Digit run scanning
// ---------------------------------------------------------------------------

/// Returns the offset past the last contiguous ASCII digit starting
/// at `start`.
pub fn scan_digits(input: &[u8], start: usize) -> usize {
    #[cfg(target_arch = "x86_64")]
    if features().sse2 {
        return unsafe { scan_digits_sse2(input, start) };
    }
    scan_digits_scalar(input, start)
}

fn scan_digits_scalar(input: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < input.len() && input[i].is_ascii_digit() {
        i += 1;
    }
    i
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn scan_digits_sse2(input: &[u8], start: usize) -> usize {
    use std::arch::x86_64::*;

    let mut i = start;
    let len = input.len();

    while i + 16 <= len {
        let chunk = _mm_loadu_si128(input.as_ptr().add(i) as *const __m128i);

        // A byte is an ASCII digit iff (byte - '0') <= 9 as an
        // *unsigned* comparison. SSE2 only has signed compares, so
        // flip the sign bit of both operands first (the standard
        // unsigned-via-signed trick) before `cmpgt`.
        let sub = _mm_sub_epi8(chunk, _mm_set1_epi8(0x30u8 as i8));
        let flip = _mm_set1_epi8(i8::MIN);
        let sub_flipped = _mm_xor_si128(sub, flip);
        let nine_flipped = _mm_xor_si128(_mm_set1_epi8(9), flip);
        let gt_nine = _mm_cmpgt_epi8(sub_flipped, nine_flipped);
        let is_digit = _mm_xor_si128(gt_nine, _mm_set1_epi8(-1));
        let mask = _mm_movemask_epi8(is_digit) as u32;

        if mask == 0xFFFF {
            i += 16;
            continue;
        }

        return scan_digits_scalar(input, i);
    }

    scan_digits_scalar(input, i)
}

// ---------------------------------------------------------------------------
// Identifier scanning
// ---------------------------------------------------------------------------

/// Scans an identifier-class token starting at `start` until a
/// delimiter byte or EOF. Returns `(end, first_slash, has_adjacent_colons)`
/// where `first_slash` is the absolute offset of the first `/` seen,
/// if any.
pub fn scan_identifier(input: &[u8], start: usize) -> (usize, Option<usize>, bool) {
    let mut i = start;
    let mut first_slash = None;
    let mut has_adjacent_colons = false;
    let mut prev_colon = false;

    while i < input.len() && !is_delimiter(input[i]) {
        let b = input[i];
        if b == b'/' && first_slash.is_none() {
            first_slash = Some(i);
        }
        if b == b':' {
            if prev_colon {
                has_adjacent_colons = true;
            }
            prev_colon = true;
        } else {
            prev_colon = false;
        }
        i += 1;
    }

    (i, first_slash, has_adjacent_colons)
}

// ---------------------------------------------------------------------------
// Newline location (error reporting only, not hot-path)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NewlineMode {
    /// Only `\n` counts as a line break.
    Lf,
    /// `\r\n` counts as a single break; bare `\r` also breaks.
    CrLfAware,
    /// CR and LF each count as their own break, never merged.
    AnyAscii,
    /// `\r\n` merged as in `CrLfAware`, plus NEL (U+0085), LS
    /// (U+2028), and PS (U+2029).
    Unicode,
}

/// Returns the ordered byte offsets of every newline in `input`,
/// according to `mode`. Used only by the error-location service.
pub fn find_all_newlines(input: &[u8], mode: NewlineMode) -> Vec<usize> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b'\n' => {
                out.push(i);
                i += 1;
            }
            b'\r' if mode == NewlineMode::CrLfAware || mode == NewlineMode::Unicode => {
                if input.get(i + 1) == Some(&b'\n') {
                    out.push(i + 1);
                    i += 2;
                } else {
                    out.push(i);
                    i += 1;
                }
            }
            b'\r' if mode == NewlineMode::AnyAscii => {
                out.push(i);
                i += 1;
            }
            0xC2 if mode == NewlineMode::Unicode && input.get(i + 1) == Some(&0x85) => {
                out.push(i + 1);
                i += 2;
            }
            0xE2 if mode == NewlineMode::Unicode
                && input.get(i + 1) == Some(&0x80)
                && matches!(input.get(i + 2), Some(&0xA8) | Some(&0xA9)) =>
            {
                out.push(i + 2);
                i += 3;
            }
            _ => i += 1,
        }
    }
    out
}
