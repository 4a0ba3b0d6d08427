//! Drives the recorder against the scriptable fake VM and prints where
//! the record streams landed. Run with:
//!
//! ```bash
//! cargo run -p cxrec-agent --example record_session
//! ```

use cxrec_agent::{telemetry, ExceptionNotice, Recorder, RecorderConfig};
use cxrec_sink::{class_load_log_name, exception_log_name};
use cxrec_test_utils::FakeVm;

fn main() {
    telemetry::init();

    let dir = std::env::temp_dir().join("cx-recorder-demo");
    std::fs::create_dir_all(&dir).expect("create demo directory");
    let recorder = Recorder::attach(RecorderConfig::new(&dir)).expect("attach recorder");

    let vm = FakeVm::new();
    let thread = vm.define_thread(1);
    let class = vm.define_class("com/example/demo/Greeter");
    let main_method = vm.define_method("com/example/demo/Main", "main", "([Ljava/lang/String;)V");
    vm.push_frame(thread, main_method, 8);

    recorder.on_class_load(&vm, thread, class);

    let exception = vm.define_exception(
        "java/lang/IllegalStateException",
        "java.lang.IllegalStateException: greeter not initialized",
        "java.lang.IllegalStateException: greeter not initialized\n\
         \tat com.example.demo.Main.main(Main.java:8)\n",
        0x00C0_FFEE,
    );
    recorder.on_exception(
        &vm,
        ExceptionNotice {
            thread,
            method: main_method,
            location: 8,
            exception,
            catch_site: None,
        },
    );

    recorder.shutdown().expect("flush streams");

    let pid = std::process::id();
    println!(
        "exception records:  {}",
        dir.join(exception_log_name(pid)).display()
    );
    println!(
        "class-load records: {}",
        dir.join(class_load_log_name(pid)).display()
    );
}
