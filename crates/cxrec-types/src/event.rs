//! The two event shapes the recorder turns into records.

use crate::{MethodRef, StackTrace, ThreadId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a thrown exception will be caught.
///
/// Absence is semantically meaningful: the exception will propagate
/// unhandled past the current frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchSite {
    /// The method containing the handler.
    pub method: MethodRef,
    /// Bytecode offset of the handler.
    pub location: i64,
}

impl CatchSite {
    /// Create a new catch site.
    pub fn new(method: MethodRef, location: i64) -> Self {
        Self { method, location }
    }
}

impl fmt::Display for CatchSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.location)
    }
}

/// One observed exception throw, fully described.
///
/// `subject_text` and `identity_hash` are captured once, inside the
/// callback that delivered the event; the subject object may be mutated
/// or collected afterwards and is never re-queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionEvent {
    /// Thread the exception was thrown on.
    pub thread: ThreadId,
    /// JVM signature of the subject's class.
    pub class_signature: String,
    /// The subject's string representation.
    pub subject_text: String,
    /// The subject's identity hash code.
    pub identity_hash: i32,
    /// Where the exception will be caught, if a handler exists.
    pub catch_site: Option<CatchSite>,
    /// The subject's full printed trace.
    pub trace_text: String,
}

impl ExceptionEvent {
    /// Whether the exception will escape the current frame unhandled.
    pub fn is_uncaught(&self) -> bool {
        self.catch_site.is_none()
    }
}

/// One observed class load with the call stack active at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLoadEvent {
    /// Thread the class was loaded on.
    pub thread: ThreadId,
    /// JVM signature of the loaded class.
    pub class_signature: String,
    /// Call stack at the load site, possibly empty.
    pub load_site_trace: StackTrace,
}
