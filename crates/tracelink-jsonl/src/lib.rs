//! Resilient JSON Lines reading for tracelink.
//!
//! Declaration files are plain JSONL: one JSON object per line. A single bad
//! line must never abort a whole analysis run, so the reader in this crate
//! keeps going past malformed input and reports what it skipped as
//! [`Warning`]s alongside the records it could parse.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod warning;

pub use error::{Error, Result};
pub use reader::{JsonlReader, Record, read_jsonl_resilient};
pub use warning::Warning;
