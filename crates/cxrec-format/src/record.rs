//! Record assembly.
//!
//! Each function produces the complete, immutable text block for one
//! event. The block is handed to the sink as a unit; nothing here does
//! I/O.

use cxrec_types::{ClassLoadEvent, ExceptionEvent};

/// Fixed marker identifying the recorder on every record.
pub const RECORD_PREFIX: &str = "[i] cx native agent: ";

/// Marker line content for an exception that will escape unhandled.
pub const NOT_CAUGHT_MARKER: &str = "will not be caught!!";

/// Header marker for a class loaded on a thread with no managed stack.
pub const NO_MANAGED_STACK_MARKER: &str = "(no managed stack)";

/// Placeholder trace text when the subject's trace cannot be rendered.
pub const TRACE_UNAVAILABLE: &str = "(trace unavailable)";

/// Build the record for one exception event.
///
/// The catch line is the authoritative handled/unhandled signal: present
/// with the exact handler method and location, or replaced by the
/// not-caught marker.
pub fn exception_record(event: &ExceptionEvent) -> String {
    let header = format!(
        "{}callback_on_Exception - {} - {} - 0x{:X}",
        RECORD_PREFIX, event.thread, event.subject_text, event.identity_hash as u32
    );
    let catch_line = match &event.catch_site {
        Some(site) => format!("\t- will be caught in: {}", site),
        None => format!("\t- {}", NOT_CAUGHT_MARKER),
    };
    format!("{}\n{}\n{}\n", header, catch_line, event.trace_text)
}

/// Build the record for one class-load event.
///
/// One `at` line per captured frame, in the order the host returned
/// them; zero lines and the no-stack marker when the thread had no
/// managed call stack.
pub fn class_load_record(event: &ClassLoadEvent) -> String {
    let marker = if event.load_site_trace.is_empty() {
        format!(" {}", NO_MANAGED_STACK_MARKER)
    } else {
        String::new()
    };
    let mut record = format!(
        "{}callback_on_ClassLoad - {} - {}{}\n",
        RECORD_PREFIX, event.thread, event.class_signature, marker
    );
    for frame in &event.load_site_trace {
        record.push_str(&format!("\tat {}\n", frame));
    }
    record.push('\n');
    record
}
