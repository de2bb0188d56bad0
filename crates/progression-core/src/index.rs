//! Auxiliary indices over a task snapshot: needed items, objective locations,
//! GPS markers, and mutually exclusive quest branches.

use crate::enriched::{NeededItem, ObjectiveGps, ObjectiveLocation};
use crate::graph::DependencyGraph;
use crate::raw::{RawTask, RawTaskSnapshot, TaskObjective};
use crate::warning::{BuildWarning, Warnings};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Indices derived from a task snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskIndices {
    /// Items required by task objectives.
    pub needed_items: Vec<NeededItem>,
    /// Map id -> tasks with an objective on that map.
    pub map_to_task_ids: BTreeMap<String, BTreeSet<String>>,
    /// Task id -> objectives placed on a map.
    pub task_to_objective_locations: BTreeMap<String, Vec<ObjectiveLocation>>,
    /// Task id -> objectives with coordinates.
    pub task_to_objective_gps: BTreeMap<String, Vec<ObjectiveGps>>,
    /// Task id -> tasks whose completion fails it.
    pub alternative_tasks: BTreeMap<String, BTreeSet<String>>,
}

impl TaskIndices {
    /// Build every index in one pass over the snapshot. `graph` is the task
    /// graph of the same snapshot and decides which fail targets exist.
    pub(crate) fn build(
        snapshot: &RawTaskSnapshot,
        graph: &DependencyGraph,
        warnings: &mut Warnings,
    ) -> Self {
        let mut indices = TaskIndices::default();
        for task in &snapshot.tasks {
            for objective in &task.objectives {
                indices.add_needed_item(task, objective, warnings);
                indices.add_location(task, objective);
            }
            indices.add_alternatives(task, graph, warnings);
        }
        indices
    }

    fn add_needed_item(&mut self, task: &RawTask, objective: &TaskObjective, warnings: &mut Warnings) {
        if objective.item.is_none() && objective.marker_item.is_none() {
            warnings.push(BuildWarning::ObjectiveWithoutItem {
                task: task.id.clone(),
                objective: objective.id.clone(),
            });
            return;
        }
        self.needed_items.push(NeededItem::TaskObjective {
            objective_id: objective.id.clone(),
            task_id: task.id.clone(),
            objective_kind: objective.kind.clone(),
            item: objective.item.clone(),
            marker_item: objective.marker_item.clone(),
            count: objective.count.unwrap_or(1),
            found_in_raid: objective.found_in_raid.unwrap_or(false),
        });
    }

    fn add_location(&mut self, task: &RawTask, objective: &TaskObjective) {
        let Some(map) = &objective.map else {
            return;
        };
        self.map_to_task_ids
            .entry(map.id.clone())
            .or_default()
            .insert(task.id.clone());
        self.task_to_objective_locations
            .entry(task.id.clone())
            .or_default()
            .push(ObjectiveLocation {
                objective_id: objective.id.clone(),
                map_id: map.id.clone(),
            });

        if let Some((x, y)) = objective.position() {
            self.task_to_objective_gps
                .entry(task.id.clone())
                .or_default()
                .push(ObjectiveGps {
                    objective_id: objective.id.clone(),
                    x,
                    y,
                });
        }
    }

    fn add_alternatives(&mut self, task: &RawTask, graph: &DependencyGraph, warnings: &mut Warnings) {
        for failed in task.finish_rewards.iter().filter_map(|r| r.failed_task()) {
            if failed == task.id {
                continue;
            }
            if !graph.has_node(failed) {
                warnings.push(BuildWarning::DanglingFailReward {
                    task: task.id.clone(),
                    failed: failed.to_string(),
                });
                continue;
            }
            self.alternative_tasks
                .entry(failed.to_string())
                .or_default()
                .insert(task.id.clone());
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::Reference;
    use crate::test_utils::*;

    fn build(snapshot: &RawTaskSnapshot) -> (TaskIndices, Vec<BuildWarning>) {
        let mut graph = DependencyGraph::new();
        for task in &snapshot.tasks {
            graph.add_node(&task.id);
        }
        let mut warnings = Warnings::default();
        let indices = TaskIndices::build(snapshot, &graph, &mut warnings);
        (indices, warnings.into_vec())
    }

    #[test]
    fn needed_item_defaults() {
        let mut t = task("t1", vec![]);
        t.objectives.push(give_item("o1", "gpu", None, None));
        let (indices, warnings) = build(&task_snapshot(vec![t]));

        assert!(warnings.is_empty());
        assert_eq!(
            indices.needed_items,
            vec![NeededItem::TaskObjective {
                objective_id: "o1".to_string(),
                task_id: "t1".to_string(),
                objective_kind: "giveItem".to_string(),
                item: Some(Reference::new("gpu")),
                marker_item: None,
                count: 1,
                found_in_raid: false,
            }]
        );
    }

    #[test]
    fn explicit_count_and_found_in_raid_are_kept() {
        let mut t = task("t1", vec![]);
        t.objectives.push(give_item("o1", "salewa", Some(4), Some(true)));
        let (indices, _) = build(&task_snapshot(vec![t]));

        assert_eq!(indices.needed_items[0].count(), 4);
        assert!(indices.needed_items[0].found_in_raid());
    }

    #[test]
    fn marker_item_counts_as_need() {
        let mut t = task("t1", vec![]);
        t.objectives.push(plant_marker("o1", "ms2000", "customs"));
        let (indices, _) = build(&task_snapshot(vec![t]));

        assert_eq!(indices.needed_items.len(), 1);
        assert_eq!(indices.needed_items[0].item().unwrap().id, "ms2000");
    }

    #[test]
    fn objectives_without_items_are_skipped() {
        let mut t = task("t1", vec![]);
        t.objectives.push(objective("o1", "shoot"));
        let (indices, warnings) = build(&task_snapshot(vec![t]));

        assert!(indices.needed_items.is_empty());
        assert_eq!(
            warnings,
            vec![BuildWarning::ObjectiveWithoutItem {
                task: "t1".to_string(),
                objective: "o1".to_string(),
            }]
        );
    }

    #[test]
    fn map_locations_and_gps() {
        let mut t1 = task("t1", vec![]);
        t1.objectives.push(visit("o1", "customs", Some((10.0, -4.5))));
        t1.objectives.push(visit("o2", "woods", None));
        let mut t2 = task("t2", vec![]);
        t2.objectives.push(visit("o3", "customs", None));

        let (indices, _) = build(&task_snapshot(vec![t1, t2]));

        let customs = &indices.map_to_task_ids["customs"];
        assert_eq!(customs.len(), 2);
        assert!(customs.contains("t1") && customs.contains("t2"));
        assert_eq!(indices.map_to_task_ids["woods"].len(), 1);

        assert_eq!(
            indices.task_to_objective_locations["t1"],
            vec![
                ObjectiveLocation {
                    objective_id: "o1".to_string(),
                    map_id: "customs".to_string()
                },
                ObjectiveLocation {
                    objective_id: "o2".to_string(),
                    map_id: "woods".to_string()
                },
            ]
        );
        assert_eq!(
            indices.task_to_objective_gps["t1"],
            vec![ObjectiveGps {
                objective_id: "o1".to_string(),
                x: 10.0,
                y: -4.5
            }]
        );
        assert!(!indices.task_to_objective_gps.contains_key("t2"));
    }

    #[test]
    fn fail_rewards_become_alternatives() {
        let mut x = task("x", vec![]);
        x.finish_rewards.push(fails("y"));
        let mut z = task("z", vec![]);
        z.finish_rewards.push(fails("y"));
        let y = task("y", vec![]);

        let (indices, warnings) = build(&task_snapshot(vec![x, y, z]));

        assert!(warnings.is_empty());
        let alternatives = &indices.alternative_tasks["y"];
        assert!(alternatives.contains("x"));
        assert!(alternatives.contains("z"));
        assert!(!indices.alternative_tasks.contains_key("x"));
    }

    #[test]
    fn fail_reward_for_unknown_task_is_skipped() {
        let mut x = task("x", vec![]);
        x.finish_rewards.push(fails("ghost"));
        let (indices, warnings) = build(&task_snapshot(vec![x]));

        assert!(indices.alternative_tasks.is_empty());
        assert!(matches!(
            warnings.as_slice(),
            [BuildWarning::DanglingFailReward { .. }]
        ));
    }
}
