//! Insertion-ordered artifact store.

use crate::domain::{Artifact, ArtifactId, ArtifactKind};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::collections::{BTreeMap, VecDeque};

/// Typed artifacts keyed by unique ID.
///
/// Iteration order is insertion order. The resolver relies on this for
/// deterministic output, so the store never removes entries and only
/// reorders them in [`merge_batches`](Self::merge_batches).
///
/// Artifacts can be added in batches (one per input file). Insertion order
/// is only meaningful inside a batch; `merge_batches` settles the order
/// between batches by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactStore {
    artifacts: IndexMap<ArtifactId, Artifact>,
    /// Batch of each entry, parallel to `artifacts`
    batches: Vec<usize>,
    current_batch: usize,
}

impl ArtifactStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an artifact if its ID is not yet known.
    ///
    /// Returns `Ok(true)` when the artifact was inserted and `Ok(false)` when
    /// the identical `(id, kind)` pair was already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if `id` is already stored with a different kind.
    /// The store is left unchanged in that case.
    pub fn add_artifact(&mut self, id: impl Into<ArtifactId>, kind: ArtifactKind) -> Result<bool> {
        let id = id.into();
        if let Some(existing) = self.artifacts.get(&id) {
            if existing.kind == kind {
                return Ok(false);
            }
            return Err(Error::Conflict {
                id,
                existing: existing.kind,
                requested: kind,
            });
        }

        self.artifacts.insert(id.clone(), Artifact::new(id, kind));
        self.batches.push(self.current_batch);
        Ok(true)
    }

    /// Start a new batch. Artifacts added from now on belong to it.
    pub fn start_batch(&mut self) {
        self.current_batch += 1;
    }

    /// Interleave the batches into one insertion order.
    ///
    /// Each batch keeps its own order. At every step the batch whose next
    /// artifact has the smallest ID goes first, so the result does not
    /// depend on the order the batches were added in. A store with a single
    /// batch is left unchanged.
    pub fn merge_batches(&mut self) {
        let mut queues: BTreeMap<usize, VecDeque<Artifact>> = BTreeMap::new();
        let artifacts = std::mem::take(&mut self.artifacts);
        for (artifact, batch) in artifacts.into_values().zip(self.batches.drain(..)) {
            queues.entry(batch).or_default().push_back(artifact);
        }

        let mut merged = IndexMap::with_capacity(queues.values().map(VecDeque::len).sum());
        while let Some(queue) = queues
            .values_mut()
            .filter(|q| !q.is_empty())
            .min_by(|a, b| a.front().map(|x| &x.id).cmp(&b.front().map(|x| &x.id)))
        {
            if let Some(artifact) = queue.pop_front() {
                merged.insert(artifact.id.clone(), artifact);
            }
        }

        self.batches = vec![0; merged.len()];
        self.current_batch = 0;
        self.artifacts = merged;
    }

    /// Look up an artifact by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no artifact has this ID.
    pub fn get(&self, id: &ArtifactId) -> Result<&Artifact> {
        self.artifacts
            .get(id)
            .ok_or_else(|| Error::NotFound(id.clone()))
    }

    /// Whether an artifact with this ID exists.
    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.artifacts.contains_key(id)
    }

    /// Insertion index of the artifact, if present.
    pub fn position(&self, id: &ArtifactId) -> Option<usize> {
        self.artifacts.get_index_of(id)
    }

    /// Level of the artifact, if present.
    pub fn level_of(&self, id: &ArtifactId) -> Option<u8> {
        self.artifacts.get(id).map(Artifact::level)
    }

    /// Lazily iterate the artifacts of one kind in insertion order.
    ///
    /// The iterator borrows the store and can be cloned to restart it.
    pub fn all_of_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &Artifact> + Clone + '_ {
        self.artifacts.values().filter(move |a| a.kind == kind)
    }

    /// Iterate all artifacts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> + Clone + '_ {
        self.artifacts.values()
    }

    /// Number of artifacts
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the store holds no artifacts
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_get() {
        let mut store = ArtifactStore::new();
        assert!(store.add_artifact("REQ-F-001", ArtifactKind::SystemRequirement).unwrap());

        let artifact = store.get(&ArtifactId::new("REQ-F-001")).unwrap();
        assert_eq!(artifact.kind, ArtifactKind::SystemRequirement);
        assert_eq!(artifact.level(), 3);
    }

    #[test]
    fn identical_reinsert_is_noop() {
        let mut store = ArtifactStore::new();
        store.add_artifact("BN-1", ArtifactKind::BusinessNeed).unwrap();
        let before = store.clone();

        assert!(!store.add_artifact("BN-1", ArtifactKind::BusinessNeed).unwrap());
        assert_eq!(store, before);
    }

    #[test]
    fn reinsert_with_other_kind_conflicts() {
        let mut store = ArtifactStore::new();
        store.add_artifact("X-1", ArtifactKind::CodeUnit).unwrap();

        let err = store.add_artifact("X-1", ArtifactKind::TestCase).unwrap_err();
        assert!(matches!(
            err,
            Error::Conflict {
                existing: ArtifactKind::CodeUnit,
                requested: ArtifactKind::TestCase,
                ..
            }
        ));
        assert_eq!(store.get(&ArtifactId::new("X-1")).unwrap().kind, ArtifactKind::CodeUnit);
    }

    #[test]
    fn get_unknown_is_not_found() {
        let store = ArtifactStore::new();
        let err = store.get(&ArtifactId::new("NOPE-1")).unwrap_err();
        assert!(matches!(err, Error::NotFound(id) if id.as_str() == "NOPE-1"));
    }

    #[test]
    fn all_of_kind_keeps_insertion_order_and_restarts() {
        let mut store = ArtifactStore::new();
        store.add_artifact("TEST-b", ArtifactKind::TestCase).unwrap();
        store.add_artifact("REQ-1", ArtifactKind::SystemRequirement).unwrap();
        store.add_artifact("TEST-a", ArtifactKind::TestCase).unwrap();

        let tests = store.all_of_kind(ArtifactKind::TestCase);
        let first: Vec<_> = tests.clone().map(|a| a.id.as_str()).collect();
        let second: Vec<_> = tests.map(|a| a.id.as_str()).collect();

        assert_eq!(first, vec!["TEST-b", "TEST-a"]);
        assert_eq!(first, second);
        assert_eq!(store.position(&ArtifactId::new("TEST-a")), Some(2));
    }

    fn ids(store: &ArtifactStore) -> Vec<&str> {
        store.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn merge_orders_batches_by_id() {
        let mut store = ArtifactStore::new();
        store.start_batch();
        store.add_artifact("BN-Z", ArtifactKind::BusinessNeed).unwrap();
        store.start_batch();
        store.add_artifact("BN-A", ArtifactKind::BusinessNeed).unwrap();
        store.add_artifact("STR-1", ArtifactKind::StakeholderRequirement).unwrap();

        store.merge_batches();

        assert_eq!(ids(&store), vec!["BN-A", "BN-Z", "STR-1"]);
        assert_eq!(store.position(&ArtifactId::new("BN-Z")), Some(1));
    }

    #[test]
    fn merge_keeps_order_inside_a_batch() {
        let mut store = ArtifactStore::new();
        store.start_batch();
        store.add_artifact("TEST-b", ArtifactKind::TestCase).unwrap();
        store.add_artifact("TEST-a", ArtifactKind::TestCase).unwrap();
        let before = ids(&store).into_iter().map(String::from).collect::<Vec<_>>();

        store.merge_batches();

        assert_eq!(ids(&store), before);
    }

    #[test]
    fn merge_ignores_batch_order() {
        let build = |first: &[&str], second: &[&str]| {
            let mut store = ArtifactStore::new();
            for batch in [first, second] {
                store.start_batch();
                for id in batch {
                    store.add_artifact(*id, ArtifactKind::CodeUnit).unwrap();
                }
            }
            store.merge_batches();
            store
        };

        let forward = build(&["CODE-3", "CODE-1"], &["CODE-2"]);
        let reversed = build(&["CODE-2"], &["CODE-3", "CODE-1"]);

        assert_eq!(ids(&forward), vec!["CODE-2", "CODE-3", "CODE-1"]);
        assert_eq!(forward, reversed);
    }
}
