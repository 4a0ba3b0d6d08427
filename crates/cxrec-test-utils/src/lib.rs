//! Test utilities for CX recorder crates.
//!
//! The centerpiece is [`FakeVm`], an in-memory host runtime that can be
//! scripted with threads, call stacks, and exception objects, and that
//! emulates the reflective dance the formatter performs (string-writer
//! construction, trace printing, string decoding). Failure injection
//! covers the degradation paths: broken member lookups, broken method
//! metadata, undecodable strings, and failing trace printing.

mod vm;

pub use vm::FakeVm;
