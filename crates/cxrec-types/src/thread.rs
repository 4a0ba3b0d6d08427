//! Thread identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable numeric identifier of a runtime thread.
///
/// Derived once per callback invocation from the host's opaque thread
/// handle; the handle itself is only valid for the callback's duration,
/// so the id is never cached across invocations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(i64);

impl ThreadId {
    /// Wrap a raw numeric id as returned by the thread's id accessor.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw numeric id.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThreadId({})", self.0)
    }
}

impl From<i64> for ThreadId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
