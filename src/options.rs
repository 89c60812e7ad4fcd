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

//! Per-call parse options.

use crate::registry::{DefaultReaderMode, ReaderRegistry};
use crate::value::Value;

/// The default nesting-depth limit, used when [`ParseOptions`]
/// doesn't set one explicitly (§6, §3 invariant 9, §7
/// `depth-exceeded`).
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options governing a single call to [`crate::read`].
pub struct ParseOptions<'r, 'a> {
    /// Tag reader registry; `None` means every tagged literal falls
    /// back to `default_mode`.
    pub readers: Option<&'r ReaderRegistry>,

    /// Policy applied when a tag has no registered reader.
    pub default_mode: DefaultReaderMode,

    /// Value to return, with no error, when the input is empty (or
    /// contains only whitespace/comments). `None` means empty input
    /// is an `unexpected-eof` error, matching a non-top-level EOF.
    pub eof_value: Option<Value<'a>>,

    /// Maximum collection/value nesting depth before `depth-exceeded`.
    pub max_depth: usize,

    /// Whether the metadata extension (`^meta form`) is enabled.
    pub metadata: bool,

    /// Whether the namespaced-map extension (`#:ns{...}`) is enabled.
    pub namespaced_maps: bool,

    /// Whether ratio literals (`3/4`) are enabled.
    pub ratios: bool,

    /// Whether text blocks (`"""..."""`) are enabled.
    pub text_blocks: bool,

    /// Whether `_` digit separators are enabled.
    pub digit_separators: bool,
}

impl<'r, 'a> Default for ParseOptions<'r, 'a> {
    fn default() -> Self {
        Self {
            readers: None,
            default_mode: DefaultReaderMode::Passthrough,
            eof_value: None,
            max_depth: DEFAULT_MAX_DEPTH,
            metadata: true,
            namespaced_maps: true,
            ratios: true,
            text_blocks: true,
            digit_separators: true,
        }
    }
}

impl<'r, 'a> ParseOptions<'r, 'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_readers(mut self, readers: &'r ReaderRegistry) -> Self {
        self.readers = Some(readers);
        self
    }

    pub fn with_default_mode(mut self, mode: DefaultReaderMode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn with_eof_value(mut self, value: Value<'a>) -> Self {
        self.eof_value = Some(value);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
