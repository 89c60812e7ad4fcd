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

//! Source locations and byte-offset-to-location resolution.

use std::fmt::{self, Display, Formatter};

/// A 1-based line-and-column location within the input.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Location {
    /// The 1-based line number, or `0` to indicate an unknown line.
    pub line: u32,

    /// The 1-based column number, or `0` to indicate an unknown column.
    pub column: u32,
}

impl Location {
    pub const UNKNOWN: Self = Self::new(0, 0);
    pub const BOF: Self = Self::new(1, 1);

    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match (self.line, self.column) {
            (0, 0) => Ok(()),
            (l, 0) => write!(f, "{}", l),
            (l, c) => write!(f, "{}:{}", l, c),
        }
    }
}

/// Resolves a byte offset into `input` to a 1-based [`Location`].
///
/// Scans `input[..offset]` for newlines via [`crate::simd::find_all_newlines`];
/// does not touch the parser's arena. Recognises `\n`, bare `\r`, and
/// `\r\n` as a single line break each.
pub fn locate(input: &[u8], offset: usize) -> Location {
    let offset = offset.min(input.len());

    let newlines = crate::simd::find_all_newlines(
        &input[..offset],
        crate::simd::NewlineMode::CrLfAware,
    );
    let line = newlines.len() as u32 + 1;
    let line_start = newlines.last().map_or(0, |&p| p + 1);
    let column = (offset - line_start) as u32 + 1;

    Location::new(line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_unknown() {
        assert_eq!( Location::UNKNOWN, Location::new(0, 0) );
    }

    #[test]
    fn location_display_fmt_n_n() {
        assert_eq!( format!("{}", Location::new(1, 2)), "1:2" );
    }

    #[test]
    fn locate_start_of_input() {
        assert_eq!( locate(b"abc", 0), Location::new(1, 1) );
    }

    #[test]
    fn locate_same_line() {
        assert_eq!( locate(b"abc", 2), Location::new(1, 3) );
    }

    #[test]
    fn locate_after_lf() {
        assert_eq!( locate(b"ab\ncd", 4), Location::new(2, 2) );
    }

    #[test]
    fn locate_after_crlf() {
        assert_eq!( locate(b"ab\r\ncd", 5), Location::new(2, 2) );
    }

    #[test]
    fn locate_after_bare_cr() {
        assert_eq!( locate(b"ab\rcd", 4), Location::new(2, 2) );
    }

    #[test]
    fn locate_multiple_lines() {
        let input = b"one\ntwo\nthree";
        assert_eq!( locate(input, 10), Location::new(3, 3) );
    }
}
