//! The fallback diagnostic channel.

use cxrec_types::RecorderError;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, warn};

/// Reports per-event failures without letting them cross the callback
/// boundary.
///
/// Diagnostic lines go to the process tracing subscriber, which is
/// distinct from the two record streams. The dropped-record counter is
/// readable by the embedder.
#[derive(Debug, Default)]
pub struct Diagnostics {
    dropped: AtomicU64,
}

impl Diagnostics {
    /// Create a fresh channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a failure that cost one whole record.
    pub fn record_dropped(&self, callback: &str, error: &RecorderError) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        error!(callback, %error, "record dropped");
    }

    /// Report a failure that degraded one field but left the record
    /// intact.
    pub fn field_degraded(&self, callback: &str, error: &RecorderError) {
        warn!(callback, %error, "field degraded");
    }

    /// Report a panic contained at the callback boundary.
    pub fn callback_panicked(&self, callback: &str, message: &str) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        error!(callback, message, "panic contained at callback boundary");
    }

    /// Number of events whose records were dropped so far.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
