//! Turning observed events into record text.
//!
//! Two layers: [`capture_call_stack`] / [`render_exception_trace`]
//! gather textual metadata through the host boundary, and
//! [`exception_record`] / [`class_load_record`] assemble the final
//! atomic record blocks written to the log streams.

mod record;
mod trace;

pub use record::{
    class_load_record, exception_record, NOT_CAUGHT_MARKER, NO_MANAGED_STACK_MARKER, RECORD_PREFIX,
    TRACE_UNAVAILABLE,
};
pub use trace::{capture_call_stack, render_exception_trace, resolve_method_ref, subject_text};
