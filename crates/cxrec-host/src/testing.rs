//! A minimal scriptable host for this crate's unit tests. The full fake
//! runtime used by the formatter and agent tests lives in
//! `cxrec-test-utils`.

use crate::{
    members, CallArg, ClassHandle, HostRuntime, MethodHandle, ObjectHandle, RawFrame, ThreadHandle,
};
use cxrec_types::{RecorderError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub struct StubHost {
    classes: Mutex<HashMap<String, ClassHandle>>,
    methods: Mutex<HashMap<(u64, String, String), MethodHandle>>,
    thread_ids: Mutex<HashMap<u64, i64>>,
    class_lookups: AtomicU64,
    next_handle: AtomicU64,
}

impl StubHost {
    pub fn empty() -> Self {
        Self {
            classes: Mutex::new(HashMap::new()),
            methods: Mutex::new(HashMap::new()),
            thread_ids: Mutex::new(HashMap::new()),
            class_lookups: AtomicU64::new(0),
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn with_catalog() -> Self {
        let host = Self::empty();
        host.define_catalog();
        host
    }

    /// Define every catalog member so resolution succeeds.
    pub fn define_catalog(&self) {
        for member in members::CATALOG {
            let class = self.define_class(member.class_name);
            let method = MethodHandle(self.fresh());
            self.methods.lock().unwrap().insert(
                (class.0, member.name.to_string(), member.signature.to_string()),
                method,
            );
        }
    }

    pub fn define_thread(&self, id: i64) -> ThreadHandle {
        let handle = ThreadHandle(self.fresh());
        self.thread_ids.lock().unwrap().insert(handle.0, id);
        handle
    }

    /// How many class lookups the host has served.
    pub fn lookup_count(&self) -> u64 {
        self.class_lookups.load(Ordering::SeqCst)
    }

    fn define_class(&self, name: &str) -> ClassHandle {
        let mut classes = self.classes.lock().unwrap();
        *classes
            .entry(name.to_string())
            .or_insert_with(|| ClassHandle(self.next_handle.fetch_add(1, Ordering::SeqCst)))
    }

    fn fresh(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::SeqCst)
    }
}

impl HostRuntime for StubHost {
    fn find_class(&self, name: &str) -> Result<ClassHandle> {
        self.class_lookups.fetch_add(1, Ordering::SeqCst);
        self.classes
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .ok_or_else(|| RecorderError::resolution(name.to_string()))
    }

    fn method_id(&self, class: ClassHandle, name: &str, signature: &str) -> Result<MethodHandle> {
        self.methods
            .lock()
            .unwrap()
            .get(&(class.0, name.to_string(), signature.to_string()))
            .copied()
            .ok_or_else(|| RecorderError::resolution(name.to_string()))
    }

    fn new_object(
        &self,
        _class: ClassHandle,
        _ctor: MethodHandle,
        _args: &[CallArg],
    ) -> Result<ObjectHandle> {
        Err(RecorderError::resolution("new_object unsupported"))
    }

    fn call_long(&self, target: ObjectHandle, _method: MethodHandle) -> Result<i64> {
        self.thread_ids
            .lock()
            .unwrap()
            .get(&target.0)
            .copied()
            .ok_or_else(|| RecorderError::resolution("Thread#getId"))
    }

    fn call_object(
        &self,
        _target: ObjectHandle,
        _method: MethodHandle,
        _args: &[CallArg],
    ) -> Result<ObjectHandle> {
        Err(RecorderError::resolution("call_object unsupported"))
    }

    fn call_void(
        &self,
        _target: ObjectHandle,
        _method: MethodHandle,
        _args: &[CallArg],
    ) -> Result<()> {
        Err(RecorderError::resolution("call_void unsupported"))
    }

    fn string_value(&self, _string: ObjectHandle) -> Result<String> {
        Err(RecorderError::encoding("string_value unsupported"))
    }

    fn object_class(&self, _object: ObjectHandle) -> Result<ClassHandle> {
        Err(RecorderError::resolution("object_class unsupported"))
    }

    fn class_signature(&self, _class: ClassHandle) -> Result<String> {
        Err(RecorderError::resolution("class_signature unsupported"))
    }

    fn method_declaring_class(&self, _method: MethodHandle) -> Result<ClassHandle> {
        Err(RecorderError::resolution("method_declaring_class unsupported"))
    }

    fn method_name(&self, _method: MethodHandle) -> Result<(String, String)> {
        Err(RecorderError::resolution("method_name unsupported"))
    }

    fn call_stack(&self, _thread: ThreadHandle, _max_depth: usize) -> Result<Vec<RawFrame>> {
        Ok(Vec::new())
    }

    fn identity_hash(&self, _object: ObjectHandle) -> Result<i32> {
        Err(RecorderError::resolution("identity_hash unsupported"))
    }
}
