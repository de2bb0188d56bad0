use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap, new_key_type};
use std::collections::{BTreeSet, HashMap};

new_key_type! {
    /// Internal handle for a node in a [`DependencyGraph`].
    pub struct NodeKey;
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// Adjacency lists for a single node, tracking direct in- and out-neighbors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NodeAdjacency {
    /// Nodes with an edge into this node.
    inputs: Vec<NodeKey>,
    /// Nodes this node has an edge to.
    outputs: Vec<NodeKey>,
}

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// A directed dependency graph keyed by string ids.
///
/// An edge `(from, to)` means `from` must be satisfied before `to` is
/// reachable. Node and edge insertion are idempotent, and every lookup is a
/// total function: unknown ids behave like isolated nodes.
///
/// Adjacency is stored in a `SecondaryMap` keyed by the node's slot key, so
/// adjacency can never get out of sync with the primary `nodes` map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    nodes: SlotMap<NodeKey, String>,
    index: HashMap<String, NodeKey>,
    adjacency: SecondaryMap<NodeKey, NodeAdjacency>,
    edge_count: usize,
}

impl DependencyGraph {
    /// Create a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Inserting an id that is already present is a no-op.
    /// Returns the node's key either way.
    pub fn add_node(&mut self, id: &str) -> NodeKey {
        if let Some(&key) = self.index.get(id) {
            return key;
        }
        let key = self.nodes.insert(id.to_string());
        self.adjacency.insert(key, NodeAdjacency::default());
        self.index.insert(id.to_string(), key);
        key
    }

    /// Insert the edge `from -> to`, adding either endpoint if it is absent.
    /// Returns `false` if the edge already existed.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let from_key = self.add_node(from);
        let to_key = self.add_node(to);

        let already_linked = self
            .adjacency
            .get(from_key)
            .is_some_and(|adj| adj.outputs.contains(&to_key));
        if already_linked {
            return false;
        }

        if let Some(adj) = self.adjacency.get_mut(from_key) {
            adj.outputs.push(to_key);
        }
        if let Some(adj) = self.adjacency.get_mut(to_key) {
            adj.inputs.push(from_key);
        }
        self.edge_count += 1;
        true
    }

    /// Check whether a node with this id exists.
    pub fn has_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Check whether the edge `from -> to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&f), Some(t)) => self
                .adjacency
                .get(f)
                .is_some_and(|adj| adj.outputs.contains(t)),
            _ => false,
        }
    }

    /// Ids of the nodes this node has a direct edge to.
    pub fn direct_successors(&self, id: &str) -> BTreeSet<String> {
        self.neighbor_ids(id, |adj| &adj.outputs)
    }

    /// Ids of the nodes with a direct edge into this node.
    pub fn direct_predecessors(&self, id: &str) -> BTreeSet<String> {
        self.neighbor_ids(id, |adj| &adj.inputs)
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterate over all node ids, in no particular order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.values().map(String::as_str)
    }

    // -----------------------------------------------------------------------
    // Key-level access used by the closure resolver
    // -----------------------------------------------------------------------

    /// Look up the key for an id.
    pub fn key(&self, id: &str) -> Option<NodeKey> {
        self.index.get(id).copied()
    }

    /// Look up the id for a key.
    pub fn id(&self, key: NodeKey) -> Option<&str> {
        self.nodes.get(key).map(String::as_str)
    }

    /// Direct in-neighbor keys of a node. Empty for unknown keys.
    pub fn input_keys(&self, key: NodeKey) -> &[NodeKey] {
        self.adjacency
            .get(key)
            .map(|adj| adj.inputs.as_slice())
            .unwrap_or(&[])
    }

    /// Direct out-neighbor keys of a node. Empty for unknown keys.
    pub fn output_keys(&self, key: NodeKey) -> &[NodeKey] {
        self.adjacency
            .get(key)
            .map(|adj| adj.outputs.as_slice())
            .unwrap_or(&[])
    }

    fn neighbor_ids(
        &self,
        id: &str,
        select: impl Fn(&NodeAdjacency) -> &Vec<NodeKey>,
    ) -> BTreeSet<String> {
        let Some(adj) = self.key(id).and_then(|key| self.adjacency.get(key)) else {
            return BTreeSet::new();
        };
        select(adj)
            .iter()
            .filter_map(|&k| self.nodes.get(k).cloned())
            .collect()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn add_nodes() {
        let mut graph = DependencyGraph::new();
        graph.add_node("a");
        graph.add_node("b");
        assert_eq!(graph.node_count(), 2);
        assert!(graph.has_node("a"));
        assert!(!graph.has_node("c"));
    }

    #[test]
    fn repeated_node_insertion_is_noop() {
        let mut graph = DependencyGraph::new();
        let first = graph.add_node("a");
        let second = graph.add_node("a");
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn repeated_edge_insertion_is_noop() {
        let mut graph = DependencyGraph::new();
        assert!(graph.add_edge("a", "b"));
        assert!(!graph.add_edge("a", "b"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.direct_successors("a"), set(&["b"]));
        assert_eq!(graph.direct_predecessors("b"), set(&["a"]));
    }

    #[test]
    fn edge_adds_missing_endpoints() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("x", "y");
        assert!(graph.has_node("x"));
        assert!(graph.has_node("y"));
        assert!(graph.has_edge("x", "y"));
        assert!(!graph.has_edge("y", "x"));
    }

    #[test]
    fn adjacency_queries() {
        // a -> b -> d
        // a -> c -> d
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("a", "c");
        graph.add_edge("b", "d");
        graph.add_edge("c", "d");

        assert_eq!(graph.direct_successors("a"), set(&["b", "c"]));
        assert_eq!(graph.direct_predecessors("d"), set(&["b", "c"]));
        assert!(graph.direct_predecessors("a").is_empty());
        assert!(graph.direct_successors("d").is_empty());
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn unknown_ids_have_no_neighbors() {
        let graph = DependencyGraph::new();
        assert!(graph.direct_successors("missing").is_empty());
        assert!(graph.direct_predecessors("missing").is_empty());
        assert!(!graph.has_edge("missing", "other"));
    }

    #[test]
    fn self_loop_is_stored() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "a");
        assert_eq!(graph.node_count(), 1);
        assert!(graph.has_edge("a", "a"));
    }

    #[test]
    fn key_and_id_round_trip() {
        let mut graph = DependencyGraph::new();
        let key = graph.add_node("stash-1");
        assert_eq!(graph.key("stash-1"), Some(key));
        assert_eq!(graph.id(key), Some("stash-1"));
    }

    #[test]
    fn serialization_preserves_edges() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");

        let json = serde_json::to_string(&graph).unwrap();
        let restored: DependencyGraph = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.node_count(), 3);
        assert_eq!(restored.edge_count(), 2);
        assert_eq!(restored.direct_successors("b"), set(&["c"]));
    }
}
