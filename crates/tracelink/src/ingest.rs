//! Loading declaration files into a [`Snapshot`].
//!
//! Declaration files are JSON Lines. Each line declares either an artifact
//! or a link:
//!
//! ```text
//! {"decl":"artifact","id":"REQ-F-001","kind":"system_requirement"}
//! {"decl":"artifact","id":"TEST-LOGIN-001"}
//! {"decl":"link","source":"TEST-LOGIN-001","target":"REQ-F-001","type":"verifies"}
//! ```
//!
//! An artifact without a `kind` gets one from the configured prefix rules.
//!
//! # Error Handling
//!
//! Loading degrades gracefully. These are recorded as [`Rejection`]s and
//! skipped, while the rest of the input still loads:
//!
//! - **Malformed lines**: not JSON, or not a declaration
//! - **Unknown kind**: no `kind` given and no prefix rule matches
//! - **Conflicts**: an ID re-declared with a different kind
//! - **Invalid links**: an artifact linked to itself
//!
//! Only I/O failures (e.g. a missing input file) abort the load.
//!
//! # Ordering
//!
//! Files are read in sorted path order and lines in file order, so the
//! artifact store's insertion order does not depend on how the file list
//! was given.

use crate::config::{PrefixRule, infer_kind};
use crate::domain::{ArtifactId, ArtifactKind, LinkType};
use crate::error::{Error, Result};
use crate::store::{ArtifactStore, LinkGraph, Snapshot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracelink_jsonl::{Warning as JsonlWarning, read_jsonl_resilient};

/// One line of a declaration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decl", rename_all = "snake_case")]
pub enum Declaration {
    /// An artifact declaration
    Artifact {
        /// Artifact ID
        id: ArtifactId,
        /// Explicit kind; inferred from the ID prefix when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<ArtifactKind>,
    },

    /// A link declaration
    Link {
        /// Lower-level end for hierarchical links
        source: ArtifactId,
        /// Higher-level end for hierarchical links
        target: ArtifactId,
        /// Link type
        #[serde(rename = "type")]
        link_type: LinkType,
    },
}

/// Why a declaration was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Line was not a parseable declaration
    MalformedLine,
    /// Kind missing and not inferable from the ID
    UnknownKind,
    /// ID already declared with another kind
    Conflict,
    /// Link from an artifact to itself
    InvalidLink,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine => write!(f, "malformed line"),
            Self::UnknownKind => write!(f, "unknown kind"),
            Self::Conflict => write!(f, "conflict"),
            Self::InvalidLink => write!(f, "invalid link"),
        }
    }
}

/// A skipped declaration and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// File the declaration was read from
    pub path: PathBuf,
    /// 1-based line number within `path`
    pub line_number: usize,
    /// Category
    pub reason: RejectionReason,
    /// Human-readable detail
    pub message: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.path.display(),
            self.line_number,
            self.reason,
            self.message
        )
    }
}

/// Counters and rejections from one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Files read
    pub files: usize,
    /// Artifacts inserted
    pub artifacts_added: usize,
    /// Links inserted
    pub links_added: usize,
    /// Exact re-declarations that changed nothing
    pub duplicates_ignored: usize,
    /// Declarations that were skipped
    pub rejections: Vec<Rejection>,
}

/// Accumulates declarations into a store and graph.
#[derive(Debug)]
pub struct Ingestor {
    rules: Vec<PrefixRule>,
    artifacts: ArtifactStore,
    links: LinkGraph,
    report: IngestReport,
}

impl Ingestor {
    /// Create an ingestor using `rules` for kind inference
    pub fn new(rules: Vec<PrefixRule>) -> Self {
        Self {
            rules,
            artifacts: ArtifactStore::new(),
            links: LinkGraph::new(),
            report: IngestReport::default(),
        }
    }

    /// Apply one declaration read from `path` at `line_number`.
    pub fn apply(&mut self, declaration: Declaration, path: &Path, line_number: usize) {
        match declaration {
            Declaration::Artifact { id, kind } => {
                let Some(kind) = kind.or_else(|| infer_kind(&self.rules, &id)) else {
                    self.reject(
                        path,
                        line_number,
                        RejectionReason::UnknownKind,
                        format!("cannot infer kind of {id}; add a \"kind\" field or a prefix rule"),
                    );
                    return;
                };
                match self.artifacts.add_artifact(id, kind) {
                    Ok(true) => self.report.artifacts_added += 1,
                    Ok(false) => self.report.duplicates_ignored += 1,
                    Err(e) => self.reject_error(path, line_number, &e),
                }
            }
            Declaration::Link {
                source,
                target,
                link_type,
            } => match self.links.add_link(source, target, link_type) {
                Ok(true) => self.report.links_added += 1,
                Ok(false) => self.report.duplicates_ignored += 1,
                Err(e) => self.reject_error(path, line_number, &e),
            },
        }
    }

    /// Read one declaration file.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be read.
    pub async fn ingest_file(&mut self, path: &Path) -> Result<()> {
        let (records, warnings) = read_jsonl_resilient::<Declaration, _>(path).await?;
        self.report.files += 1;
        self.artifacts.start_batch();
        let first_rejection = self.report.rejections.len();

        for warning in warnings {
            let message = match &warning {
                JsonlWarning::MalformedJson { error, .. } => error.clone(),
                JsonlWarning::SkippedLine { reason, .. } => reason.clone(),
            };
            self.reject(
                path,
                warning.line_number(),
                RejectionReason::MalformedLine,
                message,
            );
        }

        for record in records {
            self.apply(record.value, path, record.line_number);
        }
        self.report.rejections[first_rejection..].sort_by_key(|r| r.line_number);

        tracing::debug!(
            path = %path.display(),
            artifacts = self.artifacts.len(),
            links = self.links.len(),
            "Ingested declaration file"
        );
        Ok(())
    }

    /// Freeze what was loaded.
    ///
    /// Each file read is one batch of artifacts; the batches are merged by ID
    /// so artifact order does not depend on file names.
    pub fn finish(mut self) -> (Snapshot, IngestReport) {
        self.artifacts.merge_batches();
        (Snapshot::new(self.artifacts, self.links), self.report)
    }

    fn reject_error(&mut self, path: &Path, line_number: usize, error: &Error) {
        let reason = match error {
            Error::Conflict { .. } => RejectionReason::Conflict,
            Error::InvalidLink { .. } => RejectionReason::InvalidLink,
            _ => RejectionReason::MalformedLine,
        };
        self.reject(path, line_number, reason, error.to_string());
    }

    fn reject(&mut self, path: &Path, line_number: usize, reason: RejectionReason, message: String) {
        tracing::warn!(
            path = %path.display(),
            line_number,
            %reason,
            %message,
            "Skipping declaration"
        );
        self.report.rejections.push(Rejection {
            path: path.to_path_buf(),
            line_number,
            reason,
            message,
        });
    }
}

/// Load every file in `paths` into a snapshot.
///
/// Paths are sorted and de-duplicated before reading.
///
/// # Errors
///
/// Returns an error if any file cannot be read. Bad declarations inside a
/// readable file end up in the report instead.
pub async fn load_snapshot(
    paths: &[PathBuf],
    rules: &[PrefixRule],
) -> Result<(Snapshot, IngestReport)> {
    let mut ordered = paths.to_vec();
    ordered.sort();
    ordered.dedup();

    let mut ingestor = Ingestor::new(rules.to_vec());
    for path in &ordered {
        ingestor.ingest_file(path).await?;
    }

    let (snapshot, report) = ingestor.finish();
    tracing::info!(
        files = report.files,
        artifacts = snapshot.artifacts().len(),
        links = snapshot.links().len(),
        rejected = report.rejections.len(),
        "Loaded snapshot"
    );
    Ok((snapshot, report))
}
