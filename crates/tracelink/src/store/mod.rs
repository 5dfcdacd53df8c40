//! In-memory artifact store and link graph.
//!
//! Both halves are populated by ingestion and then frozen into a
//! [`Snapshot`] for resolution.
//!
//! # Architecture
//!
//! - [`ArtifactStore`]: `IndexMap<ArtifactId, Artifact>` for O(1) lookups that
//!   still iterate in insertion order
//! - [`LinkGraph`]: `petgraph::DiGraph` with artifact IDs as nodes and
//!   [`LinkType`](crate::domain::LinkType) as edge weights
//!
//! Links may be declared before the artifacts they mention. The graph holds
//! a node for every ID it has seen; whether that ID is a real artifact is a
//! question for the resolver.
//!
//! # Example
//!
//! ```
//! use tracelink::domain::{ArtifactKind, LinkType};
//! use tracelink::store::{ArtifactStore, LinkGraph, Snapshot};
//!
//! let mut artifacts = ArtifactStore::new();
//! artifacts.add_artifact("BN-1", ArtifactKind::BusinessNeed).unwrap();
//! artifacts.add_artifact("STR-1", ArtifactKind::StakeholderRequirement).unwrap();
//!
//! let mut links = LinkGraph::new();
//! links.add_link("STR-1", "BN-1", LinkType::Satisfies).unwrap();
//!
//! let snapshot = Snapshot::new(artifacts, links);
//! assert_eq!(snapshot.artifacts().len(), 2);
//! ```

mod artifacts;
mod graph;
mod snapshot;

pub use artifacts::ArtifactStore;
pub use graph::LinkGraph;
pub use snapshot::Snapshot;
