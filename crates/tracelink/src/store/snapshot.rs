//! Immutable snapshot handed to a resolution pass.

use super::{ArtifactStore, LinkGraph};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// An artifact store and link graph frozen for one analysis run.
///
/// A snapshot exposes only shared references. Build the store and graph
/// first, then wrap them; the resolver never sees a half-populated state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    artifacts: ArtifactStore,
    links: LinkGraph,
}

impl Snapshot {
    /// Freeze a populated store and graph
    pub fn new(artifacts: ArtifactStore, links: LinkGraph) -> Self {
        Self { artifacts, links }
    }

    /// The artifact store
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// The link graph
    pub fn links(&self) -> &LinkGraph {
        &self.links
    }

    /// SHA-256 over the snapshot contents, hex encoded.
    ///
    /// Two snapshots with the same artifacts and links in the same order
    /// share a fingerprint, and so produce identical resolutions.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for artifact in self.artifacts.iter() {
            hasher.update(format!("A|{}|{}\n", artifact.id, artifact.kind).as_bytes());
        }
        for link in self.links.links() {
            hasher.update(
                format!("L|{}|{}|{}\n", link.source, link.target, link.link_type).as_bytes(),
            );
        }

        hasher
            .finalize()
            .iter()
            .fold(String::with_capacity(64), |mut out, byte| {
                let _ = write!(out, "{byte:02x}");
                out
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtifactKind, LinkType};

    fn build(extra_link: bool) -> Snapshot {
        let mut artifacts = ArtifactStore::new();
        artifacts.add_artifact("BN-1", ArtifactKind::BusinessNeed).unwrap();
        let mut links = LinkGraph::new();
        links.add_link("STR-1", "BN-1", LinkType::Satisfies).unwrap();
        if extra_link {
            links.add_link("REQ-1", "STR-1", LinkType::Derives).unwrap();
        }
        Snapshot::new(artifacts, links)
    }

    #[test]
    fn exposes_what_it_was_built_from() {
        let snapshot = build(true);
        assert_eq!(snapshot.artifacts().len(), 1);
        assert_eq!(snapshot.links().len(), 2);
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = build(false).fingerprint();
        assert_eq!(a, build(false).fingerprint());
        assert_ne!(a, build(true).fingerprint());
        assert_eq!(a.len(), 64);
    }
}
