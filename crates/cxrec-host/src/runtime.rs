//! Reflective access to the host VM.

use cxrec_types::Result;

/// Opaque handle to a loaded class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassHandle(pub u64);

/// Opaque handle to a method of a loaded class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodHandle(pub u64);

/// Opaque handle to a runtime object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u64);

/// Opaque handle to a runtime thread.
///
/// Only valid for the duration of the callback that delivered it; never
/// stored across events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadHandle(pub u64);

impl ThreadHandle {
    /// The thread viewed as a plain object, for reflective calls on it.
    pub fn as_object(self) -> ObjectHandle {
        ObjectHandle(self.0)
    }
}

/// Argument to a reflective method call.
#[derive(Debug, Clone, Copy)]
pub enum CallArg {
    /// An object reference.
    Object(ObjectHandle),
    /// A 32-bit integer.
    Int(i32),
}

/// A stack frame as the host reports it, before metadata resolution.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame {
    /// The executing method.
    pub method: MethodHandle,
    /// Bytecode offset within the method.
    pub location: i64,
}

/// The host VM, seen from inside one of its own callbacks.
///
/// Implementations wrap whatever invocation mechanism the embedding
/// interface provides. Every operation returns `Result`; a failed lookup
/// or call is an ordinary [`cxrec_types::RecorderError`], never a
/// panic. Handles are only guaranteed valid for the current callback,
/// except class and method handles for core system types, which the
/// host keeps stable for the process lifetime.
///
/// Callbacks can fire concurrently from many runtime threads, so
/// implementations must be `Send + Sync`.
pub trait HostRuntime: Send + Sync {
    /// Look up a loaded class by its internal name, e.g. `java/lang/Thread`.
    fn find_class(&self, name: &str) -> Result<ClassHandle>;

    /// Look up a method by name and type signature on a class.
    fn method_id(&self, class: ClassHandle, name: &str, signature: &str) -> Result<MethodHandle>;

    /// Instantiate a class through one of its constructors.
    fn new_object(
        &self,
        class: ClassHandle,
        ctor: MethodHandle,
        args: &[CallArg],
    ) -> Result<ObjectHandle>;

    /// Invoke a no-argument method returning a 64-bit integer.
    fn call_long(&self, target: ObjectHandle, method: MethodHandle) -> Result<i64>;

    /// Invoke a method returning an object reference.
    fn call_object(
        &self,
        target: ObjectHandle,
        method: MethodHandle,
        args: &[CallArg],
    ) -> Result<ObjectHandle>;

    /// Invoke a void method.
    fn call_void(&self, target: ObjectHandle, method: MethodHandle, args: &[CallArg])
        -> Result<()>;

    /// Decode a runtime string object to UTF-8 text.
    fn string_value(&self, string: ObjectHandle) -> Result<String>;

    /// The class of an object.
    fn object_class(&self, object: ObjectHandle) -> Result<ClassHandle>;

    /// The JVM signature of a class, e.g. `Ljava/lang/Thread;`.
    fn class_signature(&self, class: ClassHandle) -> Result<String>;

    /// The class a method is declared on.
    fn method_declaring_class(&self, method: MethodHandle) -> Result<ClassHandle>;

    /// A method's name and type signature.
    fn method_name(&self, method: MethodHandle) -> Result<(String, String)>;

    /// Up to `max_depth` frames of a thread's call stack, innermost
    /// first. An empty vector means the thread has no managed stack.
    fn call_stack(&self, thread: ThreadHandle, max_depth: usize) -> Result<Vec<RawFrame>>;

    /// An object's identity hash code.
    fn identity_hash(&self, object: ObjectHandle) -> Result<i32>;
}
