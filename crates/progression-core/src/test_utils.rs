//! Shared snapshot builders for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::raw::*;

// ===========================================================================
// Tasks
// ===========================================================================

/// A task with the given requirements and nothing else.
pub fn task(id: &str, requirements: Vec<TaskRequirement>) -> RawTask {
    RawTask {
        id: id.to_string(),
        name: format!("Task {id}"),
        map: None,
        trader: None,
        task_requirements: requirements,
        objectives: Vec::new(),
        finish_rewards: Vec::new(),
    }
}

/// A normal "must be complete" requirement.
pub fn requires(id: &str) -> TaskRequirement {
    TaskRequirement {
        task: Reference::new(id),
        status: vec!["complete".to_string()],
    }
}

/// A "must be in progress" requirement.
pub fn requires_active(id: &str) -> TaskRequirement {
    TaskRequirement {
        task: Reference::new(id),
        status: vec!["active".to_string()],
    }
}

/// An objective with no map, item, or coordinates.
pub fn objective(id: &str, kind: &str) -> TaskObjective {
    TaskObjective {
        id: id.to_string(),
        kind: kind.to_string(),
        map: None,
        x: None,
        y: None,
        item: None,
        marker_item: None,
        count: None,
        found_in_raid: None,
    }
}

/// A hand-over objective for `count` of `item`.
pub fn give_item(id: &str, item: &str, count: Option<u32>, found_in_raid: Option<bool>) -> TaskObjective {
    TaskObjective {
        item: Some(Reference::new(item)),
        count,
        found_in_raid,
        ..objective(id, "giveItem")
    }
}

/// A marker placement objective on a map.
pub fn plant_marker(id: &str, marker: &str, map: &str) -> TaskObjective {
    TaskObjective {
        marker_item: Some(Reference::new(marker)),
        map: Some(Reference::new(map)),
        ..objective(id, "mark")
    }
}

/// A visit objective on a map, optionally with coordinates.
pub fn visit(id: &str, map: &str, position: Option<(f64, f64)>) -> TaskObjective {
    TaskObjective {
        map: Some(Reference::new(map)),
        x: position.map(|p| p.0),
        y: position.map(|p| p.1),
        ..objective(id, "visit")
    }
}

/// A finish reward that fails another task.
pub fn fails(id: &str) -> FinishReward {
    FinishReward {
        kind: RewardKind::QuestStatus,
        task: Some(Reference::new(id)),
        status: Some(FAIL_STATUS.to_string()),
    }
}

pub fn task_snapshot(tasks: Vec<RawTask>) -> RawTaskSnapshot {
    RawTaskSnapshot {
        tag: "en".to_string(),
        tasks,
    }
}

// ===========================================================================
// Hideout
// ===========================================================================

pub fn station(id: &str, levels: Vec<RawHideoutLevel>) -> RawStation {
    RawStation {
        id: id.to_string(),
        name: format!("Station {id}"),
        levels,
    }
}

pub fn level(
    id: &str,
    number: u32,
    items: Vec<ItemRequirement>,
    stations: Vec<StationLevelRequirement>,
) -> RawHideoutLevel {
    RawHideoutLevel {
        id: id.to_string(),
        level: number,
        item_requirements: items,
        station_level_requirements: stations,
    }
}

pub fn item_req(item: &str, count: u32, found_in_raid: bool) -> ItemRequirement {
    ItemRequirement {
        item: Reference::new(item),
        count,
        found_in_raid,
    }
}

pub fn station_req(station: &str, level: u32) -> StationLevelRequirement {
    StationLevelRequirement {
        station: Reference::new(station),
        level,
    }
}

pub fn hideout_snapshot(stations: Vec<RawStation>) -> RawHideoutSnapshot {
    RawHideoutSnapshot {
        tag: "en".to_string(),
        stations,
    }
}

// ===========================================================================
// Synthetic content for benchmarks
// ===========================================================================

/// A layered task snapshot: `layers` rows of `width` tasks, each task
/// requiring two tasks of the previous row. Every fifth task uses an active
/// requirement instead.
pub fn layered_tasks(layers: usize, width: usize) -> RawTaskSnapshot {
    let mut tasks = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for col in 0..width {
            let id = format!("t{layer}-{col}");
            let mut requirements = Vec::new();
            if layer > 0 {
                let prev = layer - 1;
                let left = format!("t{prev}-{col}");
                let right = format!("t{prev}-{}", (col + 1) % width);
                if col % 5 == 0 {
                    requirements.push(requires_active(&left));
                } else {
                    requirements.push(requires(&left));
                }
                requirements.push(requires(&right));
            }
            let mut raw = task(&id, requirements);
            raw.objectives
                .push(give_item(&format!("{id}-o"), "bolts", Some(2), None));
            tasks.push(raw);
        }
    }
    task_snapshot(tasks)
}
