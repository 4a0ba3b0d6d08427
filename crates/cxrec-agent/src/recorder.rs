//! Entry points and the containment boundary.

use crate::RecorderConfig;
use cxrec_format::{
    capture_call_stack, class_load_record, exception_record, render_exception_trace,
    resolve_method_ref, subject_text, TRACE_UNAVAILABLE,
};
use cxrec_host::{
    resolve_thread_id, ClassHandle, HostRuntime, MethodHandle, ObjectHandle, ReflectionCache,
    ThreadHandle,
};
use cxrec_sink::{open_streams, Diagnostics, LogSink, Stream};
use cxrec_types::{CatchSite, ClassLoadEvent, ExceptionEvent, MethodRef, Result};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::info;

const EXCEPTION_CALLBACK: &str = "callback_on_Exception";
const CLASS_LOAD_CALLBACK: &str = "callback_on_ClassLoad";

/// Raw exception-throw payload, as the host delivers it.
///
/// Throw-site method and location are part of the callback contract but
/// do not appear in the record; the catch site does.
#[derive(Debug, Clone, Copy)]
pub struct ExceptionNotice {
    /// Thread the exception was thrown on.
    pub thread: ThreadHandle,
    /// Method containing the throw site.
    pub method: MethodHandle,
    /// Bytecode offset of the throw site.
    pub location: i64,
    /// The exception object.
    pub exception: ObjectHandle,
    /// Handler method and location, when the host resolved one. `None`
    /// means the exception will propagate unhandled.
    pub catch_site: Option<(MethodHandle, i64)>,
}

/// The diagnostic recorder.
///
/// One instance per process, attached once and shared by every host
/// thread. The entry points never fail and never panic across the
/// boundary: any internal failure becomes a line on the fallback
/// diagnostic channel and the callback returns normally.
pub struct Recorder {
    config: RecorderConfig,
    cache: ReflectionCache,
    sink: LogSink,
    diagnostics: Diagnostics,
}

impl Recorder {
    /// Attach the recorder: open the two record streams and build the
    /// member cache. A failure here is fatal: no events are processed.
    pub fn attach(config: RecorderConfig) -> Result<Self> {
        let sink = open_streams(&config.directory)?;
        let cache = ReflectionCache::new(config.cache_policy);
        info!(directory = %config.directory.display(), "recorder attached");
        Ok(Self {
            config,
            cache,
            sink,
            diagnostics: Diagnostics::new(),
        })
    }

    /// Entry point for exception-throw events.
    pub fn on_exception(&self, host: &dyn HostRuntime, notice: ExceptionNotice) {
        self.contain(EXCEPTION_CALLBACK, || self.record_exception(host, notice));
    }

    /// Entry point for class-load events.
    pub fn on_class_load(&self, host: &dyn HostRuntime, thread: ThreadHandle, class: ClassHandle) {
        self.contain(CLASS_LOAD_CALLBACK, || {
            self.record_class_load(host, thread, class)
        });
    }

    /// Flush both record streams; called by the embedder at unload.
    pub fn shutdown(&self) -> Result<()> {
        self.sink.flush()?;
        info!("recorder shut down");
        Ok(())
    }

    /// The fallback diagnostic channel, for embedder inspection.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The single place failures are allowed to stop. `Result` errors
    /// and panics both end here as fallback diagnostics; control always
    /// returns to the host.
    fn contain(&self, callback: &'static str, body: impl FnOnce() -> Result<()>) {
        match catch_unwind(AssertUnwindSafe(body)) {
            Ok(Ok(())) => {}
            Ok(Err(error)) => self.diagnostics.record_dropped(callback, &error),
            Err(panic) => {
                let message = if let Some(text) = panic.downcast_ref::<&str>() {
                    (*text).to_string()
                } else if let Some(text) = panic.downcast_ref::<String>() {
                    text.clone()
                } else {
                    "unknown panic".to_string()
                };
                self.diagnostics.callback_panicked(callback, &message);
            }
        }
    }

    fn record_exception(&self, host: &dyn HostRuntime, notice: ExceptionNotice) -> Result<()> {
        let event = self.build_exception_event(host, notice)?;
        self.sink
            .append(Stream::Exceptions, &exception_record(&event))
    }

    /// Assemble the event, capturing every field exactly once.
    ///
    /// Header fields (thread id, subject text, identity hash) abort the
    /// record on failure; the catch-site reference and the trace text
    /// degrade in place instead.
    fn build_exception_event(
        &self,
        host: &dyn HostRuntime,
        notice: ExceptionNotice,
    ) -> Result<ExceptionEvent> {
        let thread = resolve_thread_id(host, &self.cache, notice.thread)?;
        let subject = subject_text(host, &self.cache, notice.exception)?;
        let identity_hash = host.identity_hash(notice.exception)?;

        let class_signature = host
            .object_class(notice.exception)
            .and_then(|class| host.class_signature(class))
            .unwrap_or_else(|error| {
                self.diagnostics.field_degraded(EXCEPTION_CALLBACK, &error);
                String::new()
            });

        let catch_site = notice.catch_site.map(|(method, location)| {
            let method_ref = resolve_method_ref(host, method).unwrap_or_else(|error| {
                self.diagnostics.field_degraded(EXCEPTION_CALLBACK, &error);
                MethodRef::unresolved()
            });
            CatchSite::new(method_ref, location)
        });

        let trace_text =
            render_exception_trace(host, &self.cache, notice.exception).unwrap_or_else(|error| {
                self.diagnostics.field_degraded(EXCEPTION_CALLBACK, &error);
                TRACE_UNAVAILABLE.to_string()
            });

        Ok(ExceptionEvent {
            thread,
            class_signature,
            subject_text: subject,
            identity_hash,
            catch_site,
            trace_text,
        })
    }

    fn record_class_load(
        &self,
        host: &dyn HostRuntime,
        thread: ThreadHandle,
        class: ClassHandle,
    ) -> Result<()> {
        let thread_id = resolve_thread_id(host, &self.cache, thread)?;
        let class_signature = host.class_signature(class)?;
        let load_site_trace = capture_call_stack(host, thread, self.config.max_stack_depth)?;

        let event = ClassLoadEvent {
            thread: thread_id,
            class_signature,
            load_site_trace,
        };
        self.sink
            .append(Stream::ClassLoads, &class_load_record(&event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxrec_test_utils::FakeVm;

    fn attach_in(dir: &tempfile::TempDir) -> Recorder {
        Recorder::attach(RecorderConfig::new(dir.path())).unwrap()
    }

    fn exception_log(dir: &tempfile::TempDir) -> String {
        let name = cxrec_sink::exception_log_name(std::process::id());
        std::fs::read_to_string(dir.path().join(name)).unwrap()
    }

    fn notice(vm: &FakeVm, exception: ObjectHandle, thread: ThreadHandle) -> ExceptionNotice {
        ExceptionNotice {
            thread,
            method: vm.define_method("com/example/Thrower", "boom", "()V"),
            location: 5,
            exception,
            catch_site: None,
        }
    }

    #[test]
    fn test_header_field_failure_drops_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = attach_in(&dir);
        let vm = FakeVm::new();
        let thread = vm.define_thread(9);
        let exception =
            vm.define_exception("java/lang/Error", "java.lang.Error", "java.lang.Error\n", 3);
        vm.break_identity_hash(exception);

        recorder.on_exception(&vm, notice(&vm, exception, thread));

        assert_eq!(recorder.diagnostics().dropped_count(), 1);
        assert!(exception_log(&dir).is_empty());
    }

    #[test]
    fn test_unrenderable_trace_degrades_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = attach_in(&dir);
        let vm = FakeVm::new();
        let thread = vm.define_thread(9);
        let exception =
            vm.define_exception("java/lang/Error", "java.lang.Error", "java.lang.Error\n", 3);
        vm.break_trace_printing(exception);

        recorder.on_exception(&vm, notice(&vm, exception, thread));

        assert_eq!(recorder.diagnostics().dropped_count(), 0);
        let log = exception_log(&dir);
        assert!(log.contains("java.lang.Error"));
        assert!(log.contains(TRACE_UNAVAILABLE));
    }

    #[test]
    fn test_unresolvable_catch_site_keeps_the_handled_signal() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = attach_in(&dir);
        let vm = FakeVm::new();
        let thread = vm.define_thread(4);
        let exception =
            vm.define_exception("java/lang/Error", "java.lang.Error", "java.lang.Error\n", 3);
        let handler = vm.define_method("com/example/Catcher", "handle", "()V");
        vm.break_method_metadata(handler);

        let mut notice = notice(&vm, exception, thread);
        notice.catch_site = Some((handler, 21));
        recorder.on_exception(&vm, notice);

        let log = exception_log(&dir);
        assert!(log.contains("\t- will be caught in: <unresolved method> 21\n"));
        assert!(!log.contains("will not be caught!!"));
        assert_eq!(recorder.diagnostics().dropped_count(), 0);
    }

    #[test]
    fn test_contain_swallows_panics() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = attach_in(&dir);

        recorder.contain("callback_on_Exception", || panic!("formatter bug"));

        assert_eq!(recorder.diagnostics().dropped_count(), 1);
    }
}
