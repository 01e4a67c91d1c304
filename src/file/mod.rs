//! File I/O for source documents.
//!
//! Documents are loaded from disk or stdin as JSON or YAML, optionally gzipped.

pub mod loader;
