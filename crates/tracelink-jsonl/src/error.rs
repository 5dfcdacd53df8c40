//! Error types for tracelink-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for tracelink-jsonl operations.
///
/// Only failures that make the whole input unreadable surface as errors.
/// Per-line problems are reported as [`crate::Warning`]s instead.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid JSONL format.
    #[error("Invalid JSONL format: {0}")]
    InvalidFormat(String),
}

/// A specialized Result type for tracelink-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
