//! Event and error types for the CX recorder.

mod error;
mod event;
mod method;
mod thread;
mod trace;

pub use error::{RecorderError, Result};
pub use event::{CatchSite, ClassLoadEvent, ExceptionEvent};
pub use method::{MethodRef, UNRESOLVED_METHOD};
pub use thread::ThreadId;
pub use trace::{StackFrame, StackTrace, MAX_STACK_DEPTH};
