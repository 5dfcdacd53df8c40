//! Typed link graph using petgraph.
//!
//! # Edge Direction Convention
//!
//! Edges are stored exactly as declared: `source -> target` with the
//! [`LinkType`] as edge weight. For hierarchical types the source is the
//! lower-level artifact:
//!
//! - **Satisfies**: `STR-1 -> BN-1` (stakeholder requirement satisfies a business need)
//! - **Verifies**: `TEST-1 -> REQ-1` (test case verifies a system requirement)
//!
//! `Conflicts` and `Duplicates` are symmetric. They are stored once, and
//! [`LinkGraph::outgoing`] / [`LinkGraph::incoming`] report the partner from
//! either end.
//!
//! Nodes are created for every ID a link mentions, whether or not the
//! artifact has been declared yet. Existence is checked by the resolver.

use crate::domain::{ArtifactId, Link, LinkType};
use crate::error::{Error, Result};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap};

/// Directed, typed links between artifact IDs.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    /// Nodes hold artifact IDs, edges hold link types.
    graph: DiGraph<ArtifactId, LinkType>,

    /// Mapping from ID to graph node. Every node has exactly one entry.
    node_map: HashMap<ArtifactId, NodeIndex>,
}

impl LinkGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link.
    ///
    /// Returns `Ok(true)` if the link was inserted and `Ok(false)` if an
    /// identical link (or, for symmetric types, its reverse) already exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLink`] if `source == target`.
    pub fn add_link(
        &mut self,
        source: impl Into<ArtifactId>,
        target: impl Into<ArtifactId>,
        link_type: LinkType,
    ) -> Result<bool> {
        let source = source.into();
        let target = target.into();

        if source == target {
            return Err(Error::InvalidLink { id: source });
        }

        if self.contains_link(&source, &target, link_type) {
            tracing::debug!(%source, %target, %link_type, "Ignoring duplicate link");
            return Ok(false);
        }

        let from = self.ensure_node(source);
        let to = self.ensure_node(target);
        self.graph.add_edge(from, to, link_type);
        Ok(true)
    }

    /// Whether this link, or its symmetric reverse, is already present.
    pub fn contains_link(&self, source: &ArtifactId, target: &ArtifactId, link_type: LinkType) -> bool {
        let (Some(&from), Some(&to)) = (self.node_map.get(source), self.node_map.get(target)) else {
            return false;
        };

        let has_edge = |a: NodeIndex, b: NodeIndex| {
            self.graph
                .edges_connecting(a, b)
                .any(|edge| *edge.weight() == link_type)
        };

        has_edge(from, to) || (link_type.is_symmetric() && has_edge(to, from))
    }

    /// IDs this artifact links to, optionally filtered by type.
    ///
    /// For symmetric types the partner is reported from both ends.
    /// Unknown IDs yield an empty set.
    pub fn outgoing(&self, id: &ArtifactId, link_type: Option<LinkType>) -> BTreeSet<ArtifactId> {
        self.neighbors(id, link_type, Direction::Outgoing)
    }

    /// IDs linking to this artifact, optionally filtered by type.
    ///
    /// For symmetric types the partner is reported from both ends.
    /// Unknown IDs yield an empty set.
    pub fn incoming(&self, id: &ArtifactId, link_type: Option<LinkType>) -> BTreeSet<ArtifactId> {
        self.neighbors(id, link_type, Direction::Incoming)
    }

    /// Iterate all links in insertion order.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.graph.edge_references().map(|edge| Link {
            source: self.graph[edge.source()].clone(),
            target: self.graph[edge.target()].clone(),
            link_type: *edge.weight(),
        })
    }

    /// Number of distinct links
    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph holds no links
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    fn ensure_node(&mut self, id: ArtifactId) -> NodeIndex {
        if let Some(&node) = self.node_map.get(&id) {
            return node;
        }
        let node = self.graph.add_node(id.clone());
        self.node_map.insert(id, node);
        node
    }

    fn neighbors(
        &self,
        id: &ArtifactId,
        link_type: Option<LinkType>,
        direction: Direction,
    ) -> BTreeSet<ArtifactId> {
        let Some(&node) = self.node_map.get(id) else {
            return BTreeSet::new();
        };
        let wanted = |t: LinkType| link_type.is_none_or(|filter| filter == t);

        let mut result = BTreeSet::new();

        for edge in self.graph.edges_directed(node, direction) {
            if wanted(*edge.weight()) {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                result.insert(self.graph[other].clone());
            }
        }

        // Symmetric links stored in the opposite direction still count.
        for edge in self.graph.edges_directed(node, direction.opposite()) {
            let weight = *edge.weight();
            if weight.is_symmetric() && wanted(weight) {
                let other = match direction {
                    Direction::Outgoing => edge.source(),
                    Direction::Incoming => edge.target(),
                };
                result.insert(self.graph[other].clone());
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(set: &BTreeSet<ArtifactId>) -> Vec<&str> {
        set.iter().map(ArtifactId::as_str).collect()
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut graph = LinkGraph::new();
        let err = graph.add_link("REQ-1", "REQ-1", LinkType::Derives).unwrap_err();
        assert!(matches!(err, Error::InvalidLink { id } if id.as_str() == "REQ-1"));
        assert!(graph.is_empty());
    }

    #[test]
    fn duplicate_link_is_idempotent() {
        let mut graph = LinkGraph::new();
        assert!(graph.add_link("STR-1", "BN-1", LinkType::Satisfies).unwrap());
        assert!(!graph.add_link("STR-1", "BN-1", LinkType::Satisfies).unwrap());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn same_pair_different_types_are_distinct() {
        let mut graph = LinkGraph::new();
        graph.add_link("REQ-1", "STR-1", LinkType::Satisfies).unwrap();
        graph.add_link("REQ-1", "STR-1", LinkType::Derives).unwrap();
        assert_eq!(graph.len(), 2);

        let id = ArtifactId::new("REQ-1");
        assert_eq!(ids(&graph.outgoing(&id, None)), vec!["STR-1"]);
        assert_eq!(ids(&graph.outgoing(&id, Some(LinkType::Derives))), vec!["STR-1"]);
        assert!(graph.outgoing(&id, Some(LinkType::Verifies)).is_empty());
    }

    #[test]
    fn reversed_symmetric_link_is_duplicate() {
        let mut graph = LinkGraph::new();
        assert!(graph.add_link("REQ-2", "REQ-3", LinkType::Conflicts).unwrap());
        assert!(!graph.add_link("REQ-3", "REQ-2", LinkType::Conflicts).unwrap());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn symmetric_partner_visible_both_ways() {
        let mut graph = LinkGraph::new();
        graph.add_link("REQ-2", "REQ-3", LinkType::Duplicates).unwrap();

        let a = ArtifactId::new("REQ-2");
        let b = ArtifactId::new("REQ-3");
        assert_eq!(ids(&graph.outgoing(&b, Some(LinkType::Duplicates))), vec!["REQ-2"]);
        assert_eq!(ids(&graph.incoming(&a, Some(LinkType::Duplicates))), vec!["REQ-3"]);
        assert_eq!(ids(&graph.outgoing(&a, None)), vec!["REQ-3"]);
    }

    #[test]
    fn hierarchical_links_stay_directed() {
        let mut graph = LinkGraph::new();
        graph.add_link("TEST-1", "REQ-1", LinkType::Verifies).unwrap();

        let test = ArtifactId::new("TEST-1");
        let req = ArtifactId::new("REQ-1");
        assert_eq!(ids(&graph.outgoing(&test, None)), vec!["REQ-1"]);
        assert!(graph.incoming(&test, None).is_empty());
        assert_eq!(ids(&graph.incoming(&req, Some(LinkType::Verifies))), vec!["TEST-1"]);
    }

    #[test]
    fn unknown_id_yields_empty_sets() {
        let graph = LinkGraph::new();
        let id = ArtifactId::new("GHOST-1");
        assert!(graph.outgoing(&id, None).is_empty());
        assert!(graph.incoming(&id, Some(LinkType::Satisfies)).is_empty());
    }

    #[test]
    fn links_iterate_in_insertion_order() {
        let mut graph = LinkGraph::new();
        graph.add_link("B-1", "A-1", LinkType::Satisfies).unwrap();
        graph.add_link("C-1", "B-1", LinkType::Derives).unwrap();
        graph.add_link("B-1", "A-1", LinkType::Satisfies).unwrap();

        let links: Vec<_> = graph.links().collect();
        assert_eq!(
            links,
            vec![
                Link::new("B-1", "A-1", LinkType::Satisfies),
                Link::new("C-1", "B-1", LinkType::Derives),
            ]
        );
    }
}
