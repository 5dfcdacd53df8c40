//! Orphans, dangling links and conflict/duplicate pairs.

use super::Resolver;
use super::chains::TraceDirection;
use crate::domain::{ArtifactId, ArtifactKind, LinkType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An artifact with no hierarchical link in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orphan {
    /// Orphaned artifact
    pub id: ArtifactId,

    /// Its kind
    pub kind: ArtifactKind,
}

/// Which end of a dangling link is missing from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSide {
    /// Source artifact missing
    Source,

    /// Target artifact missing
    Target,

    /// Neither end exists
    Both,
}

impl fmt::Display for MissingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// A link referencing an artifact that was never declared.
///
/// Dangling links are left out of chains, coverage and orphan detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingLink {
    /// Declared source
    pub source: ArtifactId,

    /// Declared target
    pub target: ArtifactId,

    /// Declared type
    #[serde(rename = "type")]
    pub link_type: LinkType,

    /// Which end is missing
    pub missing: MissingSide,
}

/// Two existing artifacts joined by a `Conflicts` or `Duplicates` link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPair {
    /// First artifact, as declared
    pub first: ArtifactId,

    /// Second artifact, as declared
    pub second: ArtifactId,

    /// `Conflicts` or `Duplicates`
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

impl Resolver<'_> {
    /// Artifacts with no usable hierarchical link, grouped by kind.
    ///
    /// Groups follow level order; within a group, store order. Conflicts,
    /// Duplicates and Depends links never rescue an artifact.
    pub fn orphans(&self) -> Vec<Orphan> {
        let artifacts = self.snapshot.artifacts();
        ArtifactKind::ALL
            .iter()
            .flat_map(|&kind| artifacts.all_of_kind(kind))
            .filter(|artifact| {
                self.hierarchical_neighbors(&artifact.id, TraceDirection::Forward)
                    .is_empty()
                    && self
                        .hierarchical_neighbors(&artifact.id, TraceDirection::Backward)
                        .is_empty()
            })
            .map(|artifact| Orphan {
                id: artifact.id.clone(),
                kind: artifact.kind,
            })
            .collect()
    }

    /// Links with a missing end, in link insertion order.
    pub fn dangling_links(&self) -> Vec<DanglingLink> {
        let artifacts = self.snapshot.artifacts();
        self.snapshot
            .links()
            .links()
            .filter_map(|link| {
                let missing = match (
                    artifacts.contains(&link.source),
                    artifacts.contains(&link.target),
                ) {
                    (true, true) => return None,
                    (false, true) => MissingSide::Source,
                    (true, false) => MissingSide::Target,
                    (false, false) => MissingSide::Both,
                };
                tracing::warn!(
                    source = %link.source,
                    target = %link.target,
                    link_type = %link.link_type,
                    %missing,
                    "Dangling link excluded from resolution"
                );
                Some(DanglingLink {
                    source: link.source,
                    target: link.target,
                    link_type: link.link_type,
                    missing,
                })
            })
            .collect()
    }

    /// Conflicts and Duplicates between existing artifacts, in link insertion order.
    pub fn related_pairs(&self) -> Vec<RelatedPair> {
        let artifacts = self.snapshot.artifacts();
        self.snapshot
            .links()
            .links()
            .filter(|link| link.link_type.is_symmetric())
            .filter(|link| artifacts.contains(&link.source) && artifacts.contains(&link.target))
            .map(|link| RelatedPair {
                first: link.source,
                second: link.target,
                link_type: link.link_type,
            })
            .collect()
    }
}
