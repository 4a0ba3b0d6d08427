//! The scriptable fake host VM.

use cxrec_host::{
    members, CallArg, ClassHandle, HostRuntime, MethodHandle, ObjectHandle, RawFrame, ThreadHandle,
};
use cxrec_types::{RecorderError, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct MethodMeta {
    class: ClassHandle,
    name: String,
    signature: String,
}

#[derive(Debug, Clone)]
struct FakeThread {
    id: i64,
    frames: Vec<RawFrame>,
}

#[derive(Debug, Clone)]
struct FakeException {
    class: ClassHandle,
    text: String,
    trace: String,
    hash: i32,
}

#[derive(Default)]
struct Inner {
    classes: HashMap<String, ClassHandle>,
    class_names: HashMap<u64, String>,
    methods: HashMap<(u64, String, String), MethodHandle>,
    method_meta: HashMap<u64, MethodMeta>,
    threads: HashMap<u64, FakeThread>,
    exceptions: HashMap<u64, FakeException>,
    strings: HashMap<u64, String>,
    writers: HashMap<u64, String>,
    print_writers: HashMap<u64, u64>,
    broken_lookups: HashSet<(String, String)>,
    broken_classes: HashSet<String>,
    broken_methods: HashSet<u64>,
    broken_traces: HashSet<u64>,
    broken_hashes: HashSet<u64>,
    undecodable_strings: HashSet<u64>,
    next_handle: u64,
}

impl Inner {
    fn fresh(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn class(&mut self, name: &str) -> ClassHandle {
        if let Some(handle) = self.classes.get(name) {
            return *handle;
        }
        let handle = ClassHandle(self.fresh());
        self.classes.insert(name.to_string(), handle);
        self.class_names.insert(handle.0, name.to_string());
        handle
    }

    fn method(&mut self, class_name: &str, name: &str, signature: &str) -> MethodHandle {
        let class = self.class(class_name);
        let key = (class.0, name.to_string(), signature.to_string());
        if let Some(handle) = self.methods.get(&key) {
            return *handle;
        }
        let handle = MethodHandle(self.fresh());
        self.methods.insert(key, handle);
        self.method_meta.insert(
            handle.0,
            MethodMeta {
                class,
                name: name.to_string(),
                signature: signature.to_string(),
            },
        );
        handle
    }
}

/// An in-memory host runtime for tests.
///
/// The well-known system members (`Thread#getId`, `Object#toString`, the
/// writer classes, `Throwable#printStackTrace`) are pre-defined; tests
/// script application threads, stacks, and exception objects on top.
pub struct FakeVm {
    inner: Mutex<Inner>,
    to_string: MethodHandle,
    print_stack_trace: MethodHandle,
    string_writer: ClassHandle,
    print_writer: ClassHandle,
}

impl FakeVm {
    /// A fake VM with the standard member catalog already loaded.
    pub fn new() -> Self {
        let mut inner = Inner::default();
        for member in members::CATALOG {
            inner.method(member.class_name, member.name, member.signature);
        }
        let to_string = inner.method(
            members::OBJECT_TO_STRING.class_name,
            members::OBJECT_TO_STRING.name,
            members::OBJECT_TO_STRING.signature,
        );
        let print_stack_trace = inner.method(
            members::THROWABLE_PRINT_STACK_TRACE.class_name,
            members::THROWABLE_PRINT_STACK_TRACE.name,
            members::THROWABLE_PRINT_STACK_TRACE.signature,
        );
        let string_writer = inner.class(members::STRING_WRITER_NEW.class_name);
        let print_writer = inner.class(members::PRINT_WRITER_NEW.class_name);
        Self {
            inner: Mutex::new(inner),
            to_string,
            print_stack_trace,
            string_writer,
            print_writer,
        }
    }

    /// Define a thread with the given numeric id and an empty stack.
    pub fn define_thread(&self, id: i64) -> ThreadHandle {
        let mut inner = self.inner.lock();
        let handle = ThreadHandle(inner.fresh());
        inner.threads.insert(
            handle.0,
            FakeThread {
                id,
                frames: Vec::new(),
            },
        );
        handle
    }

    /// Define a class by internal name, e.g. `com/example/Foo`.
    pub fn define_class(&self, name: &str) -> ClassHandle {
        self.inner.lock().class(name)
    }

    /// Define a method on a class, creating the class if needed.
    pub fn define_method(&self, class_name: &str, name: &str, signature: &str) -> MethodHandle {
        self.inner.lock().method(class_name, name, signature)
    }

    /// Push a frame onto a thread's stack. Frames pushed first are
    /// innermost, matching the order the real host reports them.
    pub fn push_frame(&self, thread: ThreadHandle, method: MethodHandle, location: i64) {
        let mut inner = self.inner.lock();
        let frame = RawFrame { method, location };
        inner
            .threads
            .get_mut(&thread.0)
            .expect("thread not defined")
            .frames
            .push(frame);
    }

    /// Define an exception object with its captured-once description.
    pub fn define_exception(
        &self,
        class_name: &str,
        text: &str,
        trace: &str,
        hash: i32,
    ) -> ObjectHandle {
        let mut inner = self.inner.lock();
        let class = inner.class(class_name);
        let handle = ObjectHandle(inner.fresh());
        inner.exceptions.insert(
            handle.0,
            FakeException {
                class,
                text: text.to_string(),
                trace: trace.to_string(),
                hash,
            },
        );
        handle
    }

    /// Make `method_id` fail for one member from now on.
    pub fn break_lookup(&self, class_name: &str, member_name: &str) {
        self.inner
            .lock()
            .broken_lookups
            .insert((class_name.to_string(), member_name.to_string()));
    }

    /// Make `find_class` fail for one class from now on.
    pub fn break_class(&self, class_name: &str) {
        self.inner.lock().broken_classes.insert(class_name.to_string());
    }

    /// Make metadata queries fail for one method handle.
    pub fn break_method_metadata(&self, method: MethodHandle) {
        self.inner.lock().broken_methods.insert(method.0);
    }

    /// Make trace printing fail for one exception object.
    pub fn break_trace_printing(&self, exception: ObjectHandle) {
        self.inner.lock().broken_traces.insert(exception.0);
    }

    /// Make the identity-hash query fail for one exception object.
    pub fn break_identity_hash(&self, exception: ObjectHandle) {
        self.inner.lock().broken_hashes.insert(exception.0);
    }

    /// Make a string object undecodable, as if it held malformed text.
    pub fn break_string_decoding(&self, string: ObjectHandle) {
        self.inner.lock().undecodable_strings.insert(string.0);
    }

    /// Number of live string-writer buffers, for asserting per-call
    /// allocation.
    pub fn writer_count(&self) -> usize {
        self.inner.lock().writers.len()
    }
}

impl Default for FakeVm {
    fn default() -> Self {
        Self::new()
    }
}

impl HostRuntime for FakeVm {
    fn find_class(&self, name: &str) -> Result<ClassHandle> {
        let inner = self.inner.lock();
        if inner.broken_classes.contains(name) {
            return Err(RecorderError::resolution(name.to_string()));
        }
        inner
            .classes
            .get(name)
            .copied()
            .ok_or_else(|| RecorderError::resolution(name.to_string()))
    }

    fn method_id(&self, class: ClassHandle, name: &str, signature: &str) -> Result<MethodHandle> {
        let inner = self.inner.lock();
        let class_name = inner
            .class_names
            .get(&class.0)
            .cloned()
            .unwrap_or_default();
        if inner
            .broken_lookups
            .contains(&(class_name, name.to_string()))
        {
            return Err(RecorderError::resolution(name.to_string()));
        }
        inner
            .methods
            .get(&(class.0, name.to_string(), signature.to_string()))
            .copied()
            .ok_or_else(|| RecorderError::resolution(name.to_string()))
    }

    fn new_object(
        &self,
        class: ClassHandle,
        _ctor: MethodHandle,
        args: &[CallArg],
    ) -> Result<ObjectHandle> {
        let mut inner = self.inner.lock();
        if class == self.string_writer {
            let handle = ObjectHandle(inner.fresh());
            inner.writers.insert(handle.0, String::new());
            return Ok(handle);
        }
        if class == self.print_writer {
            let target = match args.first() {
                Some(CallArg::Object(writer)) => writer.0,
                _ => return Err(RecorderError::resolution("PrintWriter(Writer)")),
            };
            let handle = ObjectHandle(inner.fresh());
            inner.print_writers.insert(handle.0, target);
            return Ok(handle);
        }
        Err(RecorderError::resolution("constructor"))
    }

    fn call_long(&self, target: ObjectHandle, _method: MethodHandle) -> Result<i64> {
        let inner = self.inner.lock();
        inner
            .threads
            .get(&target.0)
            .map(|thread| thread.id)
            .ok_or_else(|| RecorderError::resolution("Thread#getId"))
    }

    fn call_object(
        &self,
        target: ObjectHandle,
        method: MethodHandle,
        _args: &[CallArg],
    ) -> Result<ObjectHandle> {
        if method != self.to_string {
            return Err(RecorderError::resolution("call_object"));
        }
        let mut inner = self.inner.lock();
        let text = if let Some(exception) = inner.exceptions.get(&target.0) {
            exception.text.clone()
        } else if let Some(buffer) = inner.writers.get(&target.0) {
            buffer.clone()
        } else {
            return Err(RecorderError::resolution("Object#toString"));
        };
        let handle = ObjectHandle(inner.fresh());
        inner.strings.insert(handle.0, text);
        Ok(handle)
    }

    fn call_void(
        &self,
        target: ObjectHandle,
        method: MethodHandle,
        args: &[CallArg],
    ) -> Result<()> {
        if method != self.print_stack_trace {
            return Err(RecorderError::resolution("call_void"));
        }
        let mut inner = self.inner.lock();
        if inner.broken_traces.contains(&target.0) {
            return Err(RecorderError::resolution("Throwable#printStackTrace"));
        }
        let trace = inner
            .exceptions
            .get(&target.0)
            .map(|exception| exception.trace.clone())
            .ok_or_else(|| RecorderError::resolution("Throwable#printStackTrace"))?;
        let writer = match args.first() {
            Some(CallArg::Object(print_writer)) => inner
                .print_writers
                .get(&print_writer.0)
                .copied()
                .ok_or_else(|| RecorderError::resolution("printStackTrace(PrintWriter)"))?,
            _ => return Err(RecorderError::resolution("printStackTrace(PrintWriter)")),
        };
        inner
            .writers
            .get_mut(&writer)
            .ok_or_else(|| RecorderError::resolution("StringWriter"))?
            .push_str(&trace);
        Ok(())
    }

    fn string_value(&self, string: ObjectHandle) -> Result<String> {
        let inner = self.inner.lock();
        if inner.undecodable_strings.contains(&string.0) {
            return Err(RecorderError::encoding("malformed modified UTF-8"));
        }
        inner
            .strings
            .get(&string.0)
            .cloned()
            .ok_or_else(|| RecorderError::encoding("not a string object"))
    }

    fn object_class(&self, object: ObjectHandle) -> Result<ClassHandle> {
        let inner = self.inner.lock();
        inner
            .exceptions
            .get(&object.0)
            .map(|exception| exception.class)
            .ok_or_else(|| RecorderError::resolution("GetObjectClass"))
    }

    fn class_signature(&self, class: ClassHandle) -> Result<String> {
        let inner = self.inner.lock();
        inner
            .class_names
            .get(&class.0)
            .map(|name| format!("L{};", name))
            .ok_or_else(|| RecorderError::resolution("GetClassSignature"))
    }

    fn method_declaring_class(&self, method: MethodHandle) -> Result<ClassHandle> {
        let inner = self.inner.lock();
        if inner.broken_methods.contains(&method.0) {
            return Err(RecorderError::resolution("GetMethodDeclaringClass"));
        }
        inner
            .method_meta
            .get(&method.0)
            .map(|meta| meta.class)
            .ok_or_else(|| RecorderError::resolution("GetMethodDeclaringClass"))
    }

    fn method_name(&self, method: MethodHandle) -> Result<(String, String)> {
        let inner = self.inner.lock();
        if inner.broken_methods.contains(&method.0) {
            return Err(RecorderError::resolution("GetMethodName"));
        }
        inner
            .method_meta
            .get(&method.0)
            .map(|meta| (meta.name.clone(), meta.signature.clone()))
            .ok_or_else(|| RecorderError::resolution("GetMethodName"))
    }

    fn call_stack(&self, thread: ThreadHandle, max_depth: usize) -> Result<Vec<RawFrame>> {
        let inner = self.inner.lock();
        let thread = inner
            .threads
            .get(&thread.0)
            .ok_or_else(|| RecorderError::resolution("GetStackTrace"))?;
        Ok(thread.frames.iter().take(max_depth).copied().collect())
    }

    fn identity_hash(&self, object: ObjectHandle) -> Result<i32> {
        let inner = self.inner.lock();
        if inner.broken_hashes.contains(&object.0) {
            return Err(RecorderError::resolution("GetObjectHashCode"));
        }
        inner
            .exceptions
            .get(&object.0)
            .map(|exception| exception.hash)
            .ok_or_else(|| RecorderError::resolution("GetObjectHashCode"))
    }
}
