//! The on-disk stream convention.

use crate::LogSink;
use cxrec_types::{RecorderError, Result};
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the exception stream for a process.
pub fn exception_log_name(pid: u32) -> String {
    format!("cx_exceptions_{}.log", pid)
}

/// File name of the class-load stream for a process.
pub fn class_load_log_name(pid: u32) -> String {
    format!("cx_cls_loads_{}.log", pid)
}

/// Open the two record streams for this process in `directory`.
///
/// Called once at attach; a failure here is fatal to the recorder and
/// no events are ever processed.
pub fn open_streams(directory: &Path) -> Result<LogSink> {
    let pid = std::process::id();
    let exceptions = open(directory.join(exception_log_name(pid)))?;
    let class_loads = open(directory.join(class_load_log_name(pid)))?;
    Ok(LogSink::new(Box::new(exceptions), Box::new(class_loads)))
}

fn open(path: PathBuf) -> Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .map_err(|err| {
            RecorderError::init(format!("failed to open {}: {}", path.display(), err))
        })?;
    info!(path = %path.display(), "opened record stream");
    Ok(BufWriter::new(file))
}
