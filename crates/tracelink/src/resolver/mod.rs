//! Traceability resolution over an immutable snapshot.
//!
//! The resolver turns a [`Snapshot`] into a [`Resolution`]:
//!
//! - forward chains from every business need down towards test cases
//! - backward chains from every test case up towards business needs
//! - coverage for each adjacent level pair
//! - orphans, dangling links and conflict/duplicate pairs
//!
//! Resolution never fails. Links with a missing end are recorded as
//! [`DanglingLink`]s and otherwise ignored, so one bad declaration cannot
//! hide the rest of the report.
//!
//! # Determinism
//!
//! Seeds and next hops are visited in artifact store order. Ingestion merges
//! artifacts from different files into that order by ID (see
//! [`ArtifactStore::merge_batches`](crate::store::ArtifactStore::merge_batches)).
//! Equal snapshots therefore produce equal resolutions.
//!
//! # Example
//!
//! ```
//! use tracelink::domain::{ArtifactKind, LinkType};
//! use tracelink::resolver::{ChainStatus, resolve};
//! use tracelink::store::{ArtifactStore, LinkGraph, Snapshot};
//!
//! let mut artifacts = ArtifactStore::new();
//! artifacts.add_artifact("BN-1", ArtifactKind::BusinessNeed).unwrap();
//! artifacts.add_artifact("STR-1", ArtifactKind::StakeholderRequirement).unwrap();
//! let mut links = LinkGraph::new();
//! links.add_link("STR-1", "BN-1", LinkType::Satisfies).unwrap();
//!
//! let resolution = resolve(&Snapshot::new(artifacts, links));
//! assert_eq!(resolution.forward[0].status, ChainStatus::BrokenAtLevel(3));
//! ```

mod chains;
mod coverage;
mod findings;

pub use chains::{Chain, ChainStatus, TraceDirection};
pub use coverage::{CoverageFailure, CoverageThresholds, LevelCoverage};
pub use findings::{DanglingLink, MissingSide, Orphan, RelatedPair};

use crate::domain::{Artifact, ArtifactId, LinkType};
use crate::store::Snapshot;
use serde::{Deserialize, Serialize};

/// Everything derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Fingerprint of the snapshot this was computed from
    pub fingerprint: String,

    /// Number of artifacts in the snapshot
    pub artifact_count: usize,

    /// Number of links in the snapshot, dangling ones included
    pub link_count: usize,

    /// Chains seeded from business needs
    pub forward: Vec<Chain>,

    /// Chains seeded from test cases
    pub backward: Vec<Chain>,

    /// Coverage per adjacent level pair, top to bottom
    pub coverage: Vec<LevelCoverage>,

    /// Orphans grouped by kind
    pub orphans: Vec<Orphan>,

    /// Links with a missing end
    pub dangling: Vec<DanglingLink>,

    /// Conflicts and Duplicates pairs
    pub related: Vec<RelatedPair>,
}

/// Headline numbers for a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Artifacts in the snapshot
    pub artifacts: usize,
    /// Links in the snapshot
    pub links: usize,
    /// Complete forward chains
    pub complete_chains: usize,
    /// Broken forward chains
    pub broken_chains: usize,
    /// Orphaned artifacts
    pub orphans: usize,
    /// Dangling links
    pub dangling: usize,
    /// Conflicts/Duplicates pairs
    pub related: usize,
}

impl Resolution {
    /// Headline counts
    pub fn summary(&self) -> Summary {
        let complete_chains = self
            .forward
            .iter()
            .filter(|c| c.status.is_complete())
            .count();
        Summary {
            artifacts: self.artifact_count,
            links: self.link_count,
            complete_chains,
            broken_chains: self.forward.len() - complete_chains,
            orphans: self.orphans.len(),
            dangling: self.dangling.len(),
            related: self.related.len(),
        }
    }

    /// Level pairs below their required minimum.
    ///
    /// Degenerate pairs (no artifacts on the lower level) never fail.
    pub fn coverage_failures(&self, thresholds: &CoverageThresholds) -> Vec<CoverageFailure> {
        self.coverage
            .iter()
            .filter(|cov| !cov.degenerate)
            .filter_map(|cov| {
                let required = thresholds.min_for(cov.upper);
                (cov.percent < required).then(|| CoverageFailure {
                    coverage: cov.clone(),
                    required,
                })
            })
            .collect()
    }
}

/// Computes chains, coverage and findings for one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over `snapshot`
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Run every computation.
    pub fn resolve(&self) -> Resolution {
        tracing::debug!(
            artifacts = self.snapshot.artifacts().len(),
            links = self.snapshot.links().len(),
            "Resolving snapshot"
        );

        Resolution {
            fingerprint: self.snapshot.fingerprint(),
            artifact_count: self.snapshot.artifacts().len(),
            link_count: self.snapshot.links().len(),
            forward: self.chains(TraceDirection::Forward),
            backward: self.chains(TraceDirection::Backward),
            coverage: self.coverage(),
            orphans: self.orphans(),
            dangling: self.dangling_links(),
            related: self.related_pairs(),
        }
    }

    /// Existing artifacts one hierarchical hop away from `id`.
    ///
    /// `Forward` looks down the hierarchy (artifacts whose links target `id`),
    /// `Backward` looks up (artifacts `id` links to). Links to undeclared IDs
    /// drop out here because they have no artifact to resolve to. The result
    /// is deduplicated and sorted by store position.
    fn hierarchical_neighbors(&self, id: &ArtifactId, direction: TraceDirection) -> Vec<&'a Artifact> {
        let links = self.snapshot.links();
        let artifacts = self.snapshot.artifacts();

        let mut neighbors: Vec<(usize, &'a Artifact)> = LinkType::ALL
            .iter()
            .filter(|t| t.is_hierarchical())
            .flat_map(|&t| match direction {
                TraceDirection::Forward => links.incoming(id, Some(t)),
                TraceDirection::Backward => links.outgoing(id, Some(t)),
            })
            .filter_map(|other| {
                let position = artifacts.position(&other)?;
                let artifact = artifacts.get(&other).ok()?;
                Some((position, artifact))
            })
            .collect();

        neighbors.sort_by_key(|(position, _)| *position);
        neighbors.dedup_by_key(|(position, _)| *position);
        neighbors.into_iter().map(|(_, artifact)| artifact).collect()
    }
}

/// Resolve a snapshot in one call.
pub fn resolve(snapshot: &Snapshot) -> Resolution {
    Resolver::new(snapshot).resolve()
}
