//! The recorder itself: callback entry points, the containment
//! boundary, configuration, and the attach/shutdown lifecycle.
//!
//! The embedder owns the registration handshake with its VM and wires
//! the two entry points, [`Recorder::on_exception`] and
//! [`Recorder::on_class_load`], into its callback dispatch. Everything
//! past those entry points is this crate's problem: no failure, panic
//! included, ever crosses back into host dispatch.

mod config;
mod recorder;
pub mod telemetry;

pub use config::RecorderConfig;
pub use recorder::{ExceptionNotice, Recorder};

// Re-exported for embedders wiring up callbacks.
pub use cxrec_host::{
    CachePolicy, ClassHandle, HostRuntime, MethodHandle, ObjectHandle, ThreadHandle,
};
pub use cxrec_types::{RecorderError, Result};
