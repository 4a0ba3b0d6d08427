//! Metadata gathering through the host boundary.

use cxrec_host::{
    members, CallArg, HostRuntime, MethodHandle, ObjectHandle, ReflectionCache, ThreadHandle,
};
use cxrec_types::{MethodRef, Result, StackFrame, StackTrace};

/// Resolve a method handle to a [`MethodRef`].
pub fn resolve_method_ref(host: &dyn HostRuntime, method: MethodHandle) -> Result<MethodRef> {
    let class = host.method_declaring_class(method)?;
    let class_signature = host.class_signature(class)?;
    let (name, signature) = host.method_name(method)?;
    Ok(MethodRef::new(class_signature, name, signature))
}

/// Capture up to `max_depth` frames of a thread's call stack.
///
/// A frame whose metadata cannot be resolved becomes the fixed
/// placeholder and capture continues; a partial trace beats no trace.
/// An empty trace is returned as-is; the record builder applies the
/// `(no managed stack)` marker.
pub fn capture_call_stack(
    host: &dyn HostRuntime,
    thread: ThreadHandle,
    max_depth: usize,
) -> Result<StackTrace> {
    let raw = host.call_stack(thread, max_depth)?;
    let frames = raw
        .iter()
        .map(|frame| {
            let method =
                resolve_method_ref(host, frame.method).unwrap_or_else(|_| MethodRef::unresolved());
            StackFrame::new(method, frame.location)
        })
        .collect();
    Ok(StackTrace::from_frames(frames))
}

/// The subject's string representation, captured once per event.
pub fn subject_text(
    host: &dyn HostRuntime,
    cache: &ReflectionCache,
    object: ObjectHandle,
) -> Result<String> {
    let to_string = cache.resolve(host, members::OBJECT_TO_STRING)?;
    let text = host.call_object(object, to_string.method, &[])?;
    host.string_value(text)
}

/// Render the subject's own printed trace into text.
///
/// The writer pair is allocated fresh on every call: an exception can be
/// thrown while another is already being formatted, on this thread or
/// any other, and two renderings must never share a buffer. Each buffer
/// is single-use and dropped with the callback scope.
pub fn render_exception_trace(
    host: &dyn HostRuntime,
    cache: &ReflectionCache,
    exception: ObjectHandle,
) -> Result<String> {
    let writer_ctor = cache.resolve(host, members::STRING_WRITER_NEW)?;
    let print_ctor = cache.resolve(host, members::PRINT_WRITER_NEW)?;
    let print_stack = cache.resolve(host, members::THROWABLE_PRINT_STACK_TRACE)?;
    let to_string = cache.resolve(host, members::OBJECT_TO_STRING)?;

    let writer = host.new_object(writer_ctor.class, writer_ctor.method, &[])?;
    let print_writer = host.new_object(
        print_ctor.class,
        print_ctor.method,
        &[CallArg::Object(writer)],
    )?;
    host.call_void(exception, print_stack.method, &[CallArg::Object(print_writer)])?;

    let text = host.call_object(writer, to_string.method, &[])?;
    host.string_value(text)
}
