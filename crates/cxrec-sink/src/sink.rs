//! Serialized append streams.

use cxrec_types::Result;
use parking_lot::Mutex;
use std::io::Write;

/// Which of the two record streams a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Exception records.
    Exceptions,
    /// Class-load records.
    ClassLoads,
}

/// The two append-only record streams.
///
/// Each stream has its own lock, so exception and class-load records
/// never contend with each other; within one stream, concurrent appends
/// are serialized and each record lands as one contiguous block. A
/// failed write surfaces as a `Sink` error and the record is dropped,
/// not retried or queued.
pub struct LogSink {
    exceptions: Mutex<Box<dyn Write + Send>>,
    class_loads: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink").finish_non_exhaustive()
    }
}

impl LogSink {
    /// Build a sink over two already-open streams.
    pub fn new(exceptions: Box<dyn Write + Send>, class_loads: Box<dyn Write + Send>) -> Self {
        Self {
            exceptions: Mutex::new(exceptions),
            class_loads: Mutex::new(class_loads),
        }
    }

    /// Write one complete record as an indivisible unit.
    pub fn append(&self, stream: Stream, record: &str) -> Result<()> {
        let mut writer = self.writer(stream).lock();
        writer.write_all(record.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Flush both streams, e.g. at unload.
    pub fn flush(&self) -> Result<()> {
        self.exceptions.lock().flush()?;
        self.class_loads.lock().flush()?;
        Ok(())
    }

    fn writer(&self, stream: Stream) -> &Mutex<Box<dyn Write + Send>> {
        match stream {
            Stream::Exceptions => &self.exceptions,
            Stream::ClassLoads => &self.class_loads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<StdMutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_append_routes_to_the_right_stream() {
        let exceptions = SharedBuf::default();
        let class_loads = SharedBuf::default();
        let sink = LogSink::new(
            Box::new(exceptions.clone()),
            Box::new(class_loads.clone()),
        );

        sink.append(Stream::Exceptions, "ex record\n").unwrap();
        sink.append(Stream::ClassLoads, "cl record\n").unwrap();

        assert_eq!(exceptions.contents(), "ex record\n");
        assert_eq!(class_loads.contents(), "cl record\n");
    }

    #[test]
    fn test_write_failure_is_a_sink_error() {
        let sink = LogSink::new(Box::new(FailingWriter), Box::new(SharedBuf::default()));
        let err = sink.append(Stream::Exceptions, "record\n").unwrap_err();
        assert!(matches!(err, cxrec_types::RecorderError::Sink(_)));
    }

    #[test]
    fn test_failure_on_one_stream_leaves_the_other_usable() {
        let class_loads = SharedBuf::default();
        let sink = LogSink::new(Box::new(FailingWriter), Box::new(class_loads.clone()));

        assert!(sink.append(Stream::Exceptions, "lost\n").is_err());
        assert!(sink.append(Stream::ClassLoads, "kept\n").is_ok());
        assert_eq!(class_loads.contents(), "kept\n");
    }
}
