//! Warning types for non-fatal problems found while reading JSONL.
//!
//! A declaration file may contain hand-edited or half-written lines. Those
//! lines are skipped and described by a [`Warning`] so the caller can
//! surface them without losing the rest of the file.
//!
//! # Examples
//!
//! ```
//! use tracelink_jsonl::Warning;
//!
//! let warning = Warning::MalformedJson {
//!     line_number: 5,
//!     error: "unexpected end of input".to_string(),
//! };
//! assert_eq!(warning.line_number(), 5);
//! assert_eq!(warning.kind(), "malformed_json");
//! ```

use std::fmt;

/// A non-fatal warning produced while reading a JSONL source.
///
/// Every variant carries the 1-based line number it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A non-empty line did not parse as the expected JSON record.
    MalformedJson {
        /// The 1-based line number where the error occurred.
        line_number: usize,
        /// A description of the JSON parsing error.
        error: String,
    },

    /// A line was skipped for a reason other than malformed JSON,
    /// such as bytes that are not valid UTF-8.
    SkippedLine {
        /// The 1-based line number that was skipped.
        line_number: usize,
        /// The reason the line was skipped.
        reason: String,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Returns a human-readable description of the warning.
    ///
    /// ```
    /// use tracelink_jsonl::Warning;
    ///
    /// let warning = Warning::SkippedLine {
    ///     line_number: 3,
    ///     reason: "invalid UTF-8".to_string(),
    /// };
    /// assert_eq!(warning.description(), "line 3: skipped: invalid UTF-8");
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedJson { line_number, error } => {
                format!("line {line_number}: malformed JSON: {error}")
            }
            Self::SkippedLine {
                line_number,
                reason,
            } => {
                format!("line {line_number}: skipped: {reason}")
            }
        }
    }

    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::SkippedLine { .. } => "skipped_line",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Warning {}
