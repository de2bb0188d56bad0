//! Task (quest) dependency graph.
//!
//! Edges are added in two passes. The first pass links every normal
//! requirement directly. The second pass handles requirements that only need
//! the referenced task to be *in progress*: the referenced task is not linked,
//! instead each of its direct predecessors is linked to the dependent task.
//! The second pass reads predecessor sets captured after the first pass, so
//! it never depends on the order active requirements appear in.

use crate::closure;
use crate::config::BuildConfig;
use crate::enriched::EnrichedTask;
use crate::graph::DependencyGraph;
use crate::index::TaskIndices;
use crate::raw::RawTaskSnapshot;
use crate::warning::{BuildWarning, Warnings};
use std::collections::HashSet;

/// Everything derived from one task snapshot.
#[derive(Debug, Clone, Default)]
pub struct TaskProgression {
    /// Generation that built this half.
    pub built_in: u64,
    pub graph: DependencyGraph,
    pub tasks: Vec<EnrichedTask>,
    pub indices: TaskIndices,
    pub warnings: Vec<BuildWarning>,
}

impl TaskProgression {
    /// Look up an enriched task by id.
    pub fn task(&self, id: &str) -> Option<&EnrichedTask> {
        self.tasks.iter().find(|t| t.id() == id)
    }
}

/// Build the task graph, enriched tasks, and task indices.
pub fn build_tasks(
    snapshot: &RawTaskSnapshot,
    generation: u64,
    config: &BuildConfig,
) -> TaskProgression {
    let mut warnings = Warnings::default();
    let graph = build_graph(snapshot, config, &mut warnings);

    let ids: Vec<&str> = snapshot.tasks.iter().map(|t| t.id.as_str()).collect();
    let relations = closure::relations_for(&graph, &ids);

    let mut tasks = Vec::with_capacity(ids.len());
    for (raw, relations) in snapshot.tasks.iter().zip(relations) {
        if !graph.has_node(&raw.id) {
            warnings.push(BuildWarning::MissingNode(raw.id.clone()));
            continue;
        }
        tasks.push(EnrichedTask {
            task: raw.clone(),
            relations,
        });
    }

    let indices = TaskIndices::build(snapshot, &graph, &mut warnings);

    tracing::debug!(
        generation,
        tasks = tasks.len(),
        edges = graph.edge_count(),
        "task graph built"
    );

    TaskProgression {
        built_in: generation,
        graph,
        tasks,
        indices,
        warnings: warnings.into_vec(),
    }
}

fn build_graph(
    snapshot: &RawTaskSnapshot,
    config: &BuildConfig,
    warnings: &mut Warnings,
) -> DependencyGraph {
    let mut graph = DependencyGraph::new();

    for task in &snapshot.tasks {
        graph.add_node(&task.id);
    }
    let known: HashSet<&str> = snapshot.tasks.iter().map(|t| t.id.as_str()).collect();

    // First pass: normal requirements.
    let mut active: Vec<(&str, &str)> = Vec::new();
    for task in &snapshot.tasks {
        for requirement in &task.task_requirements {
            let required = requirement.task.id.as_str();
            if !known.contains(required) {
                warnings.push(BuildWarning::DanglingTaskRequirement {
                    task: task.id.clone(),
                    required: required.to_string(),
                });
                continue;
            }
            if requirement.is_active() {
                active.push((task.id.as_str(), required));
            } else {
                graph.add_edge(required, &task.id);
            }
        }
    }

    // Second pass: active requirements.
    loop {
        let links: Vec<(String, &str)> = active
            .iter()
            .flat_map(|&(dependent, referenced)| {
                graph
                    .direct_predecessors(referenced)
                    .into_iter()
                    .filter(move |p| p != dependent)
                    .map(move |p| (p, dependent))
            })
            .collect();

        let mut added = false;
        for (from, to) in links {
            added |= graph.add_edge(&from, to);
        }
        if !added || !config.resolve_chained_active {
            break;
        }
    }

    graph
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use std::collections::BTreeSet;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn build(tasks: Vec<crate::raw::RawTask>) -> TaskProgression {
        build_tasks(&task_snapshot(tasks), 1, &BuildConfig::default())
    }

    #[test]
    fn normal_requirements_link_directly() {
        let built = build(vec![
            task("a", vec![]),
            task("b", vec![requires("a")]),
            task("c", vec![requires("b")]),
        ]);

        assert!(built.graph.has_edge("a", "b"));
        assert!(built.graph.has_edge("b", "c"));

        let c = built.task("c").unwrap();
        assert_eq!(c.relations.predecessors, set(&["a", "b"]));
        assert_eq!(c.relations.parents, set(&["b"]));

        let a = built.task("a").unwrap();
        assert_eq!(a.relations.successors, set(&["b", "c"]));
        assert_eq!(a.relations.children, set(&["b"]));
    }

    #[test]
    fn active_requirement_links_through_predecessors() {
        // a -> b normally; c needs b active.
        let built = build(vec![
            task("a", vec![]),
            task("b", vec![requires("a")]),
            task("c", vec![requires_active("b")]),
        ]);

        assert!(built.graph.has_edge("a", "c"));
        assert!(!built.graph.has_edge("b", "c"));

        let c = built.task("c").unwrap();
        assert_eq!(c.relations.predecessors, set(&["a"]));
        assert!(!c.relations.predecessors.contains("b"));
        assert_eq!(c.relations.parents, set(&["a"]));

        let b = built.task("b").unwrap();
        assert_eq!(b.relations.predecessors, set(&["a"]));
        assert!(b.relations.successors.is_empty());

        let a = built.task("a").unwrap();
        assert_eq!(a.relations.successors, set(&["b", "c"]));
        assert_eq!(a.relations.children, set(&["b", "c"]));
    }

    #[test]
    fn active_requirement_on_root_task_adds_nothing() {
        let built = build(vec![task("b", vec![]), task("c", vec![requires_active("b")])]);

        assert_eq!(built.graph.edge_count(), 0);
        let c = built.task("c").unwrap();
        assert!(c.relations.predecessors.is_empty());
        assert!(c.relations.parents.is_empty());
    }

    #[test]
    fn active_pass_is_order_independent() {
        // c is listed first, yet still sees a as b's predecessor.
        let built = build(vec![
            task("c", vec![requires_active("b")]),
            task("b", vec![requires("a")]),
            task("a", vec![]),
        ]);
        assert_eq!(built.task("c").unwrap().relations.predecessors, set(&["a"]));
    }

    #[test]
    fn chained_active_requirements_stop_after_one_pass_by_default() {
        // a -> b, c needs b active, d needs c active.
        let tasks = vec![
            task("a", vec![]),
            task("b", vec![requires("a")]),
            task("c", vec![requires_active("b")]),
            task("d", vec![requires_active("c")]),
        ];

        let built = build(tasks.clone());
        assert!(built.task("d").unwrap().relations.predecessors.is_empty());

        let config = BuildConfig {
            resolve_chained_active: true,
            ..BuildConfig::default()
        };
        let built = build_tasks(&task_snapshot(tasks), 1, &config);
        assert_eq!(built.task("d").unwrap().relations.predecessors, set(&["a"]));
    }

    #[test]
    fn dangling_requirement_is_skipped_with_warning() {
        let built = build(vec![task("a", vec![requires("ghost"), requires_active("phantom")])]);

        assert_eq!(built.graph.edge_count(), 0);
        assert_eq!(built.graph.node_count(), 1);
        assert_eq!(
            built.warnings,
            vec![
                BuildWarning::DanglingTaskRequirement {
                    task: "a".to_string(),
                    required: "ghost".to_string(),
                },
                BuildWarning::DanglingTaskRequirement {
                    task: "a".to_string(),
                    required: "phantom".to_string(),
                },
            ]
        );
    }

    #[test]
    fn cyclic_requirements_terminate() {
        let built = build(vec![
            task("a", vec![requires("c")]),
            task("b", vec![requires("a")]),
            task("c", vec![requires("b")]),
            task("s", vec![requires("s")]),
        ]);

        for t in &built.tasks {
            assert!(!t.relations.predecessors.contains(t.id()));
            assert!(!t.relations.successors.contains(t.id()));
            assert!(!t.relations.parents.contains(t.id()));
            assert!(!t.relations.children.contains(t.id()));
        }
        assert_eq!(built.task("a").unwrap().relations.predecessors, set(&["b", "c"]));
    }

    #[test]
    fn every_task_is_enriched_once() {
        let built = build(vec![task("a", vec![]), task("b", vec![requires("zzz")])]);
        let ids: Vec<&str> = built.tasks.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn indices_come_from_same_snapshot() {
        let mut a = task("a", vec![]);
        a.objectives.push(give_item("o1", "ledx", Some(2), Some(true)));
        a.finish_rewards.push(fails("b"));
        let built = build(vec![a, task("b", vec![])]);

        assert_eq!(built.indices.needed_items.len(), 1);
        assert_eq!(built.indices.alternative_tasks["b"], set(&["a"]));
    }
}
