//! Property tests for the store and resolver.

use proptest::prelude::*;
use tracelink::domain::{ArtifactId, ArtifactKind, Link, LinkType};
use tracelink::resolver::resolve;
use tracelink::store::{ArtifactStore, LinkGraph, Snapshot};

/// IDs at or above the declared artifact count are never declared, so links
/// to them dangle.
const ID_POOL: usize = 16;

fn id(idx: usize) -> ArtifactId {
    ArtifactId::new(format!("A{idx}"))
}

fn build(kinds: &[usize], links: &[(usize, usize, usize)]) -> Snapshot {
    let mut store = ArtifactStore::new();
    for (idx, &kind) in kinds.iter().enumerate() {
        store.add_artifact(id(idx), ArtifactKind::ALL[kind]).unwrap();
    }

    let mut graph = LinkGraph::new();
    for &(src, tgt, ty) in links {
        if src != tgt {
            graph.add_link(id(src), id(tgt), LinkType::ALL[ty]).unwrap();
        }
    }

    Snapshot::new(store, graph)
}

fn kinds_strategy() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(0..6usize, 1..12)
}

fn links_strategy() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    proptest::collection::vec((0..ID_POOL, 0..ID_POOL, 0..7usize), 0..40)
}

proptest! {
    #[test]
    fn prop_add_artifact_is_idempotent(kinds in kinds_strategy()) {
        let mut once = ArtifactStore::new();
        let mut twice = ArtifactStore::new();

        for (idx, &kind) in kinds.iter().enumerate() {
            once.add_artifact(id(idx), ArtifactKind::ALL[kind]).unwrap();
            prop_assert!(twice.add_artifact(id(idx), ArtifactKind::ALL[kind]).unwrap());
            prop_assert!(!twice.add_artifact(id(idx), ArtifactKind::ALL[kind]).unwrap());
        }

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_add_link_is_idempotent(links in links_strategy()) {
        let mut once = LinkGraph::new();
        let mut twice = LinkGraph::new();

        for &(src, tgt, ty) in &links {
            if src == tgt {
                continue;
            }
            once.add_link(id(src), id(tgt), LinkType::ALL[ty]).unwrap();
            twice.add_link(id(src), id(tgt), LinkType::ALL[ty]).unwrap();
            prop_assert!(!twice.add_link(id(src), id(tgt), LinkType::ALL[ty]).unwrap());
        }

        let once_links: Vec<Link> = once.links().collect();
        let twice_links: Vec<Link> = twice.links().collect();
        prop_assert_eq!(once_links, twice_links);
    }

    #[test]
    fn prop_coverage_is_a_percentage(kinds in kinds_strategy(), links in links_strategy()) {
        let resolution = resolve(&build(&kinds, &links));

        prop_assert_eq!(resolution.coverage.len(), 5);
        for cov in &resolution.coverage {
            prop_assert!(cov.percent <= 100);
            prop_assert!(cov.covered <= cov.total);
            if cov.total == 0 {
                prop_assert!(cov.degenerate);
                prop_assert_eq!(cov.percent, 100);
            }
        }
    }

    #[test]
    fn prop_resolution_is_deterministic(kinds in kinds_strategy(), links in links_strategy()) {
        let first = resolve(&build(&kinds, &links));
        let second = resolve(&build(&kinds, &links));

        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_dangling_links_never_reach_chains(kinds in kinds_strategy(), links in links_strategy()) {
        let snapshot = build(&kinds, &links);
        let resolution = resolve(&snapshot);
        let store = snapshot.artifacts();

        for dangling in &resolution.dangling {
            prop_assert!(!store.contains(&dangling.source) || !store.contains(&dangling.target));
        }
        for chain in resolution.forward.iter().chain(&resolution.backward) {
            for artifact in &chain.artifacts {
                prop_assert!(store.contains(artifact));
            }
        }
        for pair in &resolution.related {
            prop_assert!(store.contains(&pair.first) && store.contains(&pair.second));
        }
    }

    #[test]
    fn prop_chain_members_are_not_orphans(kinds in kinds_strategy(), links in links_strategy()) {
        let resolution = resolve(&build(&kinds, &links));

        for chain in resolution.forward.iter().chain(&resolution.backward) {
            if chain.artifacts.len() < 2 {
                continue;
            }
            for artifact in &chain.artifacts {
                prop_assert!(resolution.orphans.iter().all(|o| &o.id != artifact));
            }
        }
    }

    #[test]
    fn prop_symmetric_links_never_rescue_orphans(count in 2..8usize, pairs in proptest::collection::vec((0..8usize, 0..8usize, 3..5usize), 0..20)) {
        let kinds = vec![2usize; count];
        let links: Vec<(usize, usize, usize)> = pairs
            .into_iter()
            .filter(|&(a, b, _)| a < count && b < count)
            .collect();

        let resolution = resolve(&build(&kinds, &links));

        prop_assert_eq!(resolution.orphans.len(), count);
    }
}
