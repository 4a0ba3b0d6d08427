//! Concurrent-writer stress: every appended block must round-trip
//! intact, with no lines from another record spliced in.

use cxrec_sink::{class_load_log_name, exception_log_name, open_streams, Stream};
use std::sync::Arc;
use std::thread;

const WRITERS: usize = 8;
const RECORDS_PER_WRITER: usize = 200;

#[test]
fn test_concurrent_records_never_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(open_streams(dir.path()).unwrap());

    let mut handles = Vec::new();
    for writer in 0..WRITERS {
        let sink = Arc::clone(&sink);
        handles.push(thread::spawn(move || {
            for record in 0..RECORDS_PER_WRITER {
                let tag = format!("{} {}", writer, record);
                let block = format!(
                    "header {}\n\tmiddle {}\n\ttail {}\n\n",
                    tag, tag, tag
                );
                let stream = if writer % 2 == 0 {
                    Stream::Exceptions
                } else {
                    Stream::ClassLoads
                };
                sink.append(stream, &block).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    sink.flush().unwrap();

    let pid = std::process::id();
    for name in [exception_log_name(pid), class_load_log_name(pid)] {
        let contents = std::fs::read_to_string(dir.path().join(name)).unwrap();
        let blocks: Vec<&str> = contents.split_terminator("\n\n").collect();
        assert_eq!(blocks.len(), WRITERS / 2 * RECORDS_PER_WRITER);

        for block in blocks {
            let lines: Vec<&str> = block.lines().collect();
            assert_eq!(lines.len(), 3, "torn record block: {:?}", block);
            let tag = lines[0].strip_prefix("header ").expect("torn header");
            assert_eq!(lines[1], format!("\tmiddle {}", tag));
            assert_eq!(lines[2], format!("\ttail {}", tag));
        }
    }
}
