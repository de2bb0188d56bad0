//! Raw snapshot records as delivered by the content service.
//!
//! These are immutable inputs to a rebuild. Field names follow the service's
//! camelCase JSON so a fetched payload deserializes directly.

use serde::{Deserialize, Serialize};

// ===========================================================================
// Shared
// ===========================================================================

/// A reference to another record by id, with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

// ===========================================================================
// Tasks
// ===========================================================================

/// Requirement status that turns a prerequisite into an "in progress" link.
pub const ACTIVE_STATUS: &str = "active";

/// Quest-status reward status marking another task as failed.
pub const FAIL_STATUS: &str = "Fail";

/// A quest as published by the content service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub map: Option<Reference>,
    #[serde(default)]
    pub trader: Option<Reference>,
    #[serde(default)]
    pub task_requirements: Vec<TaskRequirement>,
    #[serde(default)]
    pub objectives: Vec<TaskObjective>,
    #[serde(default)]
    pub finish_rewards: Vec<FinishReward>,
}

/// A prerequisite on another task, satisfied when that task is in any of
/// the listed statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequirement {
    pub task: Reference,
    #[serde(default)]
    pub status: Vec<String>,
}

impl TaskRequirement {
    /// Whether this requirement only needs the referenced task in progress.
    pub fn is_active(&self) -> bool {
        self.status.iter().any(|s| s == ACTIVE_STATUS)
    }
}

/// A sub-goal of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskObjective {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub map: Option<Reference>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub item: Option<Reference>,
    #[serde(default)]
    pub marker_item: Option<Reference>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub found_in_raid: Option<bool>,
}

impl TaskObjective {
    /// Map coordinates, present only when both axes are.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }
}

/// The kind of a finish reward. Only quest-status rewards matter to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RewardKind {
    QuestStatus,
    Item,
    TraderStanding,
    Skill,
    #[serde(other)]
    Other,
}

/// A reward granted on finishing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishReward {
    #[serde(rename = "type")]
    pub kind: RewardKind,
    #[serde(default)]
    pub task: Option<Reference>,
    #[serde(default)]
    pub status: Option<String>,
}

impl FinishReward {
    /// The task this reward fails, if it is a quest-status "Fail" reward.
    pub fn failed_task(&self) -> Option<&str> {
        match (self.kind, &self.task, self.status.as_deref()) {
            (RewardKind::QuestStatus, Some(task), Some(FAIL_STATUS)) => Some(task.id.as_str()),
            _ => None,
        }
    }
}

/// A full task snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTaskSnapshot {
    /// Language/version tag. Opaque to the engine.
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub tasks: Vec<RawTask>,
}

// ===========================================================================
// Hideout
// ===========================================================================

/// An item cost of a hideout level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequirement {
    pub item: Reference,
    pub count: u32,
    #[serde(default)]
    pub found_in_raid: bool,
}

/// A prerequisite on another station reaching a given level number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationLevelRequirement {
    pub station: Reference,
    pub level: u32,
}

/// One numbered tier of a hideout station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHideoutLevel {
    pub id: String,
    pub level: u32,
    #[serde(default)]
    pub item_requirements: Vec<ItemRequirement>,
    #[serde(default)]
    pub station_level_requirements: Vec<StationLevelRequirement>,
}

/// A hideout station and its levels. The station is the parent of every
/// level it lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub levels: Vec<RawHideoutLevel>,
}

/// A full hideout snapshot, grouped by station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHideoutSnapshot {
    /// Language/version tag. Opaque to the engine.
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub stations: Vec<RawStation>,
}

impl RawHideoutSnapshot {
    /// Iterate over every level paired with its parent station, in order.
    pub fn levels(&self) -> impl Iterator<Item = (&RawStation, &RawHideoutLevel)> {
        self.stations
            .iter()
            .flat_map(|station| station.levels.iter().map(move |level| (station, level)))
    }
}
