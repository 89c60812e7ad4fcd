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

//! A reader for the Extensible Data Notation (EDN): scalars, keyed
//! identifiers, four collection kinds, tagged literals, reader
//! macros, and the usual optional extensions.
//!
//! ```
//! let arena = edn::Arena::new();
//! let doc = edn::read(&arena, b"[1 2 :three]", &edn::ParseOptions::new()).unwrap();
//! assert_eq!( doc.root.as_vector().unwrap().len(), 3 );
//! ```

pub mod arena;
pub mod charclass;
pub mod cursor;
pub mod equality;
pub mod error;
pub mod location;
pub mod options;
pub mod parser;
pub mod registry;
pub mod scan;
pub mod simd;
pub mod uniqueness;
pub mod value;

pub use arena::Arena;
pub use error::{ErrorKind, ReadError, ReadResult};
pub use options::ParseOptions;
pub use parser::{read, Document};
pub use registry::{DefaultReaderMode, ReaderRegistry};
pub use value::{Ident, Value, ValueKind};
