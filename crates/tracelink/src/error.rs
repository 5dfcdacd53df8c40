//! Error types for tracelink operations.

use crate::domain::{ArtifactId, ArtifactKind};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for tracelink operations.
///
/// None of these is fatal to an analysis run on its own: ingestion records
/// `Conflict` and `InvalidLink` and moves on, and the resolver never returns
/// an error at all (dangling links are recorded in its output instead).
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Declaration file could not be read as JSONL.
    #[error("Invalid declaration file: {0}")]
    InvalidFormat(String),

    /// Artifact ID re-declared with a different kind.
    #[error("Artifact {id} already declared as {existing}, cannot redeclare as {requested}")]
    Conflict {
        /// The conflicting ID
        id: ArtifactId,
        /// Kind already in the store
        existing: ArtifactKind,
        /// Kind that was requested
        requested: ArtifactKind,
    },

    /// Link from an artifact to itself.
    #[error("Invalid link: {id} cannot link to itself")]
    InvalidLink {
        /// The artifact on both ends
        id: ArtifactId,
    },

    /// Artifact not found.
    #[error("Artifact not found: {0}")]
    NotFound(ArtifactId),
}

impl From<tracelink_jsonl::Error> for Error {
    fn from(err: tracelink_jsonl::Error) -> Self {
        match err {
            tracelink_jsonl::Error::Io(io_err) => Error::Io(io_err),
            tracelink_jsonl::Error::Json(json_err) => Error::Json(json_err),
            tracelink_jsonl::Error::InvalidFormat(msg) => Error::InvalidFormat(msg),
        }
    }
}

/// Errors related to locating and parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file between the start directory and the filesystem root.
    #[error("No tracelink.yaml found in {0} or any parent directory. Run 'tracelink init' first.")]
    NotFound(PathBuf),

    /// Configuration file already exists.
    #[error("Configuration already exists at {0}. Use --force to overwrite.")]
    AlreadyExists(PathBuf),

    /// YAML could not be parsed or written.
    #[error("Configuration error: {0}")]
    Yaml(String),

    /// Configuration parsed but holds an invalid value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A specialized Result type for tracelink operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_both_kinds() {
        let err = Error::Conflict {
            id: ArtifactId::new("REQ-1"),
            existing: ArtifactKind::SystemRequirement,
            requested: ArtifactKind::TestCase,
        };
        let msg = err.to_string();
        assert!(msg.contains("REQ-1"));
        assert!(msg.contains("system_requirement"));
        assert!(msg.contains("test_case"));
    }

    #[test]
    fn jsonl_io_error_maps_to_io() {
        let err: Error = tracelink_jsonl::Error::Io(io::Error::other("boom")).into();
        assert!(matches!(err, Error::Io(_)));
    }
}
