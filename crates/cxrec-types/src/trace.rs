//! Call stack snapshots.

use crate::MethodRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of frames captured for a class-load record.
pub const MAX_STACK_DEPTH: usize = 100;

/// One frame of a captured call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// The executing method.
    pub method: MethodRef,
    /// Bytecode offset within the method.
    pub location: i64,
}

impl StackFrame {
    /// Create a new frame.
    pub fn new(method: MethodRef, location: i64) -> Self {
        Self { method, location }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.location)
    }
}

/// A finite, point-in-time snapshot of a thread's call stack.
///
/// Frames are stored in the order the runtime returned them
/// (innermost-first); no reordering is applied. The snapshot is not
/// restartable and not lazy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackTrace {
    frames: Vec<StackFrame>,
}

impl StackTrace {
    /// An empty trace, for threads with no managed call stack.
    pub fn empty() -> Self {
        Self { frames: Vec::new() }
    }

    /// Build a trace from frames already capped by the capturer.
    pub fn from_frames(frames: Vec<StackFrame>) -> Self {
        Self { frames }
    }

    /// The captured frames, innermost first.
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Number of captured frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the thread had no managed call stack at capture time.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a StackFrame;
    type IntoIter = std::slice::Iter<'a, StackFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
