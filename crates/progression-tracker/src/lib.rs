//! Progress queries over a published progression generation.
//!
//! Completion flags are owned by the caller. Anything implementing
//! [`CompletionStore`] can back a [`Tracker`]; [`ProgressState`] is a plain
//! in-memory store that serializes with serde.

use progression_core::engine::Generation;
use progression_core::enriched::NeededItem;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ===========================================================================
// Completion store
// ===========================================================================

/// Read access to per-user completion flags.
pub trait CompletionStore {
    fn is_task_complete(&self, task_id: &str) -> bool;
    fn is_module_complete(&self, module_id: &str) -> bool;
}

/// In-memory completion flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressState {
    completed_tasks: BTreeSet<String>,
    built_modules: BTreeSet<String>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a task's completion flag. Returns the previous value.
    pub fn set_task_complete(&mut self, task_id: &str, complete: bool) -> bool {
        if complete {
            !self.completed_tasks.insert(task_id.to_string())
        } else {
            self.completed_tasks.remove(task_id)
        }
    }

    /// Set or clear a module's built flag. Returns the previous value.
    pub fn set_module_complete(&mut self, module_id: &str, complete: bool) -> bool {
        if complete {
            !self.built_modules.insert(module_id.to_string())
        } else {
            self.built_modules.remove(module_id)
        }
    }

    pub fn completed_task_count(&self) -> usize {
        self.completed_tasks.len()
    }

    pub fn built_module_count(&self) -> usize {
        self.built_modules.len()
    }
}

impl CompletionStore for ProgressState {
    fn is_task_complete(&self, task_id: &str) -> bool {
        self.completed_tasks.contains(task_id)
    }

    fn is_module_complete(&self, module_id: &str) -> bool {
        self.built_modules.contains(module_id)
    }
}

// ===========================================================================
// Statuses and errors
// ===========================================================================

/// Where a task stands for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Completed,
    /// A mutually exclusive task was completed instead.
    Failed,
    /// Every direct prerequisite is complete.
    Available,
    Locked,
}

/// Where a hideout module stands for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleStatus {
    Built,
    /// Every direct prerequisite level is built.
    Buildable,
    Locked,
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("task not found: {0}")]
    UnknownTask(String),
    #[error("hideout module not found: {0}")]
    UnknownModule(String),
}

// ===========================================================================
// Tracker
// ===========================================================================

/// Answers progress questions for one generation and one completion store.
///
/// Borrowing the generation pins the tracker to a single consistent build.
pub struct Tracker<'a, S: CompletionStore + ?Sized> {
    generation: &'a Generation,
    store: &'a S,
}

impl<'a, S: CompletionStore + ?Sized> Tracker<'a, S> {
    pub fn new(generation: &'a Generation, store: &'a S) -> Self {
        Self { generation, store }
    }

    pub fn generation(&self) -> &'a Generation {
        self.generation
    }

    fn require_task(&self, id: &str) -> Result<(), TrackerError> {
        if self.generation.task(id).is_some() {
            Ok(())
        } else {
            Err(TrackerError::UnknownTask(id.to_string()))
        }
    }

    fn require_module(&self, id: &str) -> Result<(), TrackerError> {
        if self.generation.hideout_module(id).is_some() {
            Ok(())
        } else {
            Err(TrackerError::UnknownModule(id.to_string()))
        }
    }

    fn is_failed(&self, id: &str) -> bool {
        self.generation
            .alternative_tasks()
            .get(id)
            .is_some_and(|rivals| rivals.iter().any(|r| self.store.is_task_complete(r)))
    }

    fn task_status_unchecked(&self, id: &str) -> TaskStatus {
        if self.store.is_task_complete(id) {
            return TaskStatus::Completed;
        }
        if self.is_failed(id) {
            return TaskStatus::Failed;
        }
        let ready = self
            .generation
            .task_graph()
            .direct_predecessors(id)
            .iter()
            .all(|p| self.store.is_task_complete(p));
        if ready {
            TaskStatus::Available
        } else {
            TaskStatus::Locked
        }
    }

    /// Status of a single task.
    pub fn task_status(&self, id: &str) -> Result<TaskStatus, TrackerError> {
        self.require_task(id)?;
        Ok(self.task_status_unchecked(id))
    }

    /// Transitive prerequisites of `id` that are not complete yet.
    pub fn blockers(&self, id: &str) -> Result<BTreeSet<String>, TrackerError> {
        let task = self
            .generation
            .task(id)
            .ok_or_else(|| TrackerError::UnknownTask(id.to_string()))?;
        Ok(task
            .relations
            .predecessors
            .iter()
            .filter(|p| !self.store.is_task_complete(p))
            .cloned()
            .collect())
    }

    /// Transitive dependents of `id` that are not complete yet.
    pub fn unlocks(&self, id: &str) -> Result<BTreeSet<String>, TrackerError> {
        let task = self
            .generation
            .task(id)
            .ok_or_else(|| TrackerError::UnknownTask(id.to_string()))?;
        Ok(task
            .relations
            .successors
            .iter()
            .filter(|s| !self.store.is_task_complete(s))
            .cloned()
            .collect())
    }

    /// Ids of available tasks, in snapshot order, minus excluded ids.
    pub fn available_tasks(&self) -> Vec<&'a str> {
        let generation = self.generation;
        generation
            .tasks()
            .iter()
            .map(|t| t.id())
            .filter(|id| !generation.is_excluded(id))
            .filter(|id| self.task_status_unchecked(id) == TaskStatus::Available)
            .collect()
    }

    /// Status of a single hideout module.
    pub fn module_status(&self, id: &str) -> Result<ModuleStatus, TrackerError> {
        self.require_module(id)?;
        if self.store.is_module_complete(id) {
            return Ok(ModuleStatus::Built);
        }
        let ready = self
            .generation
            .hideout_graph()
            .direct_predecessors(id)
            .iter()
            .all(|p| self.store.is_module_complete(p));
        Ok(if ready {
            ModuleStatus::Buildable
        } else {
            ModuleStatus::Locked
        })
    }

    /// Needed items still relevant to this user: items of tasks that are not
    /// complete, failed, or excluded, and of modules not yet built.
    pub fn outstanding_items(&self) -> Vec<&'a NeededItem> {
        let generation = self.generation;
        let tasks = generation.needed_item_task_objectives().iter().filter(|need| {
            let task = need.owner_id();
            !self.store.is_task_complete(task)
                && !generation.is_excluded(task)
                && !self.is_failed(task)
        });
        let modules = generation
            .needed_item_hideout_modules()
            .iter()
            .filter(|need| !self.store.is_module_complete(need.owner_id()));
        tasks.chain(modules).collect()
    }

    /// Outstanding item counts summed per item id.
    pub fn outstanding_item_totals(&self) -> BTreeMap<String, u64> {
        let mut totals = BTreeMap::new();
        for need in self.outstanding_items() {
            if let Some(item) = need.item() {
                *totals.entry(item.id.clone()).or_insert(0) += u64::from(need.count());
            }
        }
        totals
    }
}

// ===========================================================================
// Tests
// ===========================================================================
