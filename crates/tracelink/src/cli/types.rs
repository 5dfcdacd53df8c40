//! Types shared between CLI dispatch and command execution.

use std::fmt;

/// A single report section printed by its own subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Forward traceability matrix
    Forward,
    /// Backward traceability matrix
    Backward,
    /// Coverage table
    Coverage,
    /// Orphan list
    Orphans,
    /// Dangling-link list
    Dangling,
    /// Conflicts/duplicates list
    Related,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
            Self::Coverage => write!(f, "coverage"),
            Self::Orphans => write!(f, "orphans"),
            Self::Dangling => write!(f, "dangling"),
            Self::Related => write!(f, "related"),
        }
    }
}

/// Returned by `check` when at least one level pair is below its minimum.
///
/// The binary maps this to exit status [`CoverageGateFailed::EXIT_CODE`]
/// instead of printing it as an error; the report has already been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("coverage check failed for {failures} level pair(s)")]
pub struct CoverageGateFailed {
    /// Number of failing pairs
    pub failures: usize,
}

impl CoverageGateFailed {
    /// Process exit status for a failed gate
    pub const EXIT_CODE: u8 = 2;
}
