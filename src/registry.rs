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

//! The tag-reader registry (per call) and the external-type registry
//! (process-wide).

use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::Mutex;

use crate::arena::Arena;
use crate::value::Value;

/// A user-supplied function invoked for a registered tag. Takes the
/// form the tag wraps and the arena backing the parse, and either
/// rewrites it or reports a reader-defined failure message.
pub type ReaderFn = dyn for<'a> Fn(Value<'a>, &'a Arena) -> Result<Value<'a>, String> + Send + Sync;

/// Maps tag strings to [`ReaderFn`]s for one parse call.
///
/// Construction and destruction are independent of any parse; a
/// caller must not mutate a registry while a parse referencing it is
/// in progress (§5).
#[derive(Default)]
pub struct ReaderRegistry {
    readers: HashMap<String, Box<ReaderFn>>,
}

impl ReaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `f` for `tag`, overriding any previous registration.
    pub fn register(&mut self, tag: impl Into<String>, f: impl for<'a> Fn(Value<'a>, &'a Arena) -> Result<Value<'a>, String> + Send + Sync + 'static) {
        self.readers.insert(tag.into(), Box::new(f));
    }

    pub fn unregister(&mut self, tag: &str) {
        self.readers.remove(tag);
    }

    pub fn lookup(&self, tag: &str) -> Option<&ReaderFn> {
        self.readers.get(tag).map(|b| b.as_ref())
    }
}

/// The policy applied to a tagged literal whose tag has no registered
/// reader (§4.9).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DefaultReaderMode {
    #[default]
    Passthrough,
    Unwrap,
    Error,
}

/// Process-wide table of (equality, hash) function pairs for
/// `external` values, keyed by a caller-assigned 32-bit type id.
/// Registration is not required to be thread-safe against concurrent
/// lookups from an in-flight parse (§5); this crate guards the table
/// with a mutex only to avoid undefined behaviour from data races
/// within Rust's memory model, not to promise any particular
/// interleaving.
pub struct ExternalTypeTable {
    inner: Mutex<HashMap<u32, ExternalTypeOps>>,
}

#[derive(Clone, Copy)]
struct ExternalTypeOps {
    eq: fn(*const (), *const ()) -> bool,
    hash: fn(*const ()) -> u64,
}

impl ExternalTypeTable {
    pub fn register(&self, type_id: u32, eq: fn(*const (), *const ()) -> bool, hash: fn(*const ()) -> u64) {
        self.inner.lock().insert(type_id, ExternalTypeOps { eq, hash });
    }

    pub fn unregister(&self, type_id: u32) {
        self.inner.lock().remove(&type_id);
    }

    pub fn eq(&self, type_id: u32, a: *const (), b: *const ()) -> bool {
        match self.inner.lock().get(&type_id) {
            Some(ops) => (ops.eq)(a, b),
            None => std::ptr::eq(a, b),
        }
    }

    pub fn hash(&self, type_id: u32, ptr: *const ()) -> u64 {
        match self.inner.lock().get(&type_id) {
            Some(ops) => (ops.hash)(ptr),
            None => ptr as u64,
        }
    }
}

static EXTERNAL_TYPES: OnceLock<ExternalTypeTable> = OnceLock::new();

/// Returns the process-wide external-type registry, initialising it
/// on first use.
pub fn external_types() -> &'static ExternalTypeTable {
    EXTERNAL_TYPES.get_or_init(|| ExternalTypeTable { inner: Mutex::new(HashMap::new()) })
}
