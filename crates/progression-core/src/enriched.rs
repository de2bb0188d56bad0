//! Derived records published to consumers after a rebuild.

use crate::raw::{RawHideoutLevel, RawTask, Reference};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Graph relations of a single node. No set ever contains the node itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Relations {
    /// Transitive ancestors.
    pub predecessors: BTreeSet<String>,
    /// Transitive descendants.
    pub successors: BTreeSet<String>,
    /// Direct in-neighbors.
    pub parents: BTreeSet<String>,
    /// Direct out-neighbors.
    pub children: BTreeSet<String>,
}

impl Relations {
    /// Drop `id` from every set.
    pub(crate) fn without(mut self, id: &str) -> Self {
        self.predecessors.remove(id);
        self.successors.remove(id);
        self.parents.remove(id);
        self.children.remove(id);
        self
    }
}

// ---------------------------------------------------------------------------
// Enriched records
// ---------------------------------------------------------------------------

/// A raw task plus its graph relations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTask {
    pub task: RawTask,
    pub relations: Relations,
}

impl EnrichedTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }
}

/// A raw hideout level plus its parent station and graph relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedModule {
    pub station_id: String,
    pub station_name: String,
    pub level: RawHideoutLevel,
    pub relations: Relations,
}

impl EnrichedModule {
    pub fn id(&self) -> &str {
        &self.level.id
    }
}

// ---------------------------------------------------------------------------
// Needed items
// ---------------------------------------------------------------------------

/// An item still required somewhere in the progression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "needType", rename_all = "camelCase")]
pub enum NeededItem {
    /// Required by a task objective.
    TaskObjective {
        objective_id: String,
        task_id: String,
        objective_kind: String,
        item: Option<Reference>,
        marker_item: Option<Reference>,
        count: u32,
        found_in_raid: bool,
    },
    /// Required to build a hideout level. The module is the enriched record
    /// as of the rebuild that produced this entry.
    HideoutModule {
        item: Reference,
        count: u32,
        found_in_raid: bool,
        module: Arc<EnrichedModule>,
    },
}

impl NeededItem {
    /// The item this entry asks for. Objectives prefer the item over the
    /// marker item.
    pub fn item(&self) -> Option<&Reference> {
        match self {
            NeededItem::TaskObjective {
                item, marker_item, ..
            } => item.as_ref().or(marker_item.as_ref()),
            NeededItem::HideoutModule { item, .. } => Some(item),
        }
    }

    pub fn count(&self) -> u32 {
        match self {
            NeededItem::TaskObjective { count, .. } | NeededItem::HideoutModule { count, .. } => {
                *count
            }
        }
    }

    pub fn found_in_raid(&self) -> bool {
        match self {
            NeededItem::TaskObjective { found_in_raid, .. }
            | NeededItem::HideoutModule { found_in_raid, .. } => *found_in_raid,
        }
    }

    /// Id of the task or hideout level that owns this need.
    pub fn owner_id(&self) -> &str {
        match self {
            NeededItem::TaskObjective { task_id, .. } => task_id,
            NeededItem::HideoutModule { module, .. } => module.id(),
        }
    }
}

// ---------------------------------------------------------------------------
// Objective locations
// ---------------------------------------------------------------------------

/// An objective placed on a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectiveLocation {
    pub objective_id: String,
    pub map_id: String,
}

/// An objective with map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveGps {
    pub objective_id: String,
    pub x: f64,
    pub y: f64,
}
