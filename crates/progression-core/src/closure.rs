//! Transitive closure queries over a [`DependencyGraph`].
//!
//! Both directions use the same depth-first worklist walk. The visited set is
//! checked before a neighbor is expanded, so malformed input with cycles still
//! terminates. The start node is never part of its own closure.

use crate::enriched::Relations;
use crate::graph::{DependencyGraph, NodeKey};
use std::collections::{BTreeSet, HashSet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Every node that can reach `id` (its transitive ancestors).
pub fn ancestors(graph: &DependencyGraph, id: &str) -> BTreeSet<String> {
    walk(graph, id, DependencyGraph::input_keys)
}

/// Every node reachable from `id` (its transitive descendants).
pub fn descendants(graph: &DependencyGraph, id: &str) -> BTreeSet<String> {
    walk(graph, id, DependencyGraph::output_keys)
}

/// Full relations of one node. The node itself is removed from every set.
pub fn relations(graph: &DependencyGraph, id: &str) -> Relations {
    Relations {
        predecessors: ancestors(graph, id),
        successors: descendants(graph, id),
        parents: graph.direct_predecessors(id),
        children: graph.direct_successors(id),
    }
    .without(id)
}

/// Relations for many nodes, in the order given. With the `parallel`
/// feature the closures are computed on the rayon pool.
pub fn relations_for(graph: &DependencyGraph, ids: &[&str]) -> Vec<Relations> {
    #[cfg(feature = "parallel")]
    {
        ids.par_iter().map(|id| relations(graph, id)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        ids.iter().map(|id| relations(graph, id)).collect()
    }
}

fn walk<'g>(
    graph: &'g DependencyGraph,
    id: &str,
    neighbors: fn(&'g DependencyGraph, NodeKey) -> &'g [NodeKey],
) -> BTreeSet<String> {
    let Some(start) = graph.key(id) else {
        return BTreeSet::new();
    };

    let mut visited: HashSet<NodeKey> = HashSet::new();
    let mut stack: Vec<NodeKey> = neighbors(graph, start).iter().rev().copied().collect();

    while let Some(key) = stack.pop() {
        if !visited.insert(key) {
            continue;
        }
        for &next in neighbors(graph, key).iter().rev() {
            if !visited.contains(&next) {
                stack.push(next);
            }
        }
    }

    visited.remove(&start);
    visited
        .into_iter()
        .filter_map(|key| graph.id(key).map(str::to_string))
        .collect()
}
