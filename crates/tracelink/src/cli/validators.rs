//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use std::path::PathBuf;

/// Validate a declaration file argument.
///
/// The path must name an existing regular file.
pub fn validate_input_file(s: &str) -> Result<PathBuf, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Input file path cannot be empty".to_string());
    }

    let path = PathBuf::from(s);
    if path.is_dir() {
        return Err(format!("'{s}' is a directory, expected a JSONL file"));
    }
    if !path.is_file() {
        return Err(format!("Input file '{s}' does not exist"));
    }

    Ok(path)
}
