//! Error types for the recorder.

use thiserror::Error;

/// The error type for all recorder operations.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// A required metadata lookup (class, method, accessor) failed.
    #[error("metadata resolution failed for {what}")]
    Resolution {
        /// The lookup that was attempted, e.g. `java/lang/Thread#getId`.
        what: String,
    },

    /// Text extracted from the runtime could not be decoded.
    #[error("text decoding failed: {0}")]
    Encoding(String),

    /// A log stream write failed.
    #[error("log write failed: {0}")]
    Sink(#[from] std::io::Error),

    /// Option parsing or stream setup failed at attach time.
    #[error("recorder initialization failed: {0}")]
    Init(String),
}

impl RecorderError {
    /// Create a resolution error naming the attempted lookup.
    pub fn resolution(what: impl Into<String>) -> Self {
        Self::Resolution { what: what.into() }
    }

    /// Create an encoding error.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Whether this error is fatal to the whole recorder rather than to a
    /// single record. Only initialization failures are.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Init(_))
    }
}

/// Result type alias using the recorder's error.
pub type Result<T> = std::result::Result<T, RecorderError>;
