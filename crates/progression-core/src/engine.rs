//! Rebuild orchestration and generation publishing.
//!
//! A [`Generation`] is immutable once built. [`Progression::rebuild`] builds
//! the next one in fresh storage and only then swaps the published handle, so
//! a consumer holding an `Arc<Generation>` always sees one consistent
//! snapshot pair.

use crate::config::BuildConfig;
use crate::enriched::{EnrichedModule, EnrichedTask, NeededItem, ObjectiveGps, ObjectiveLocation};
use crate::graph::DependencyGraph;
use crate::hideout::{HideoutProgression, build_hideout};
use crate::raw::{RawHideoutSnapshot, RawTaskSnapshot};
use crate::task::{TaskProgression, build_tasks};
use crate::warning::BuildWarning;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// One published, internally consistent set of derived progression data.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    generation: u64,
    tasks: Arc<TaskProgression>,
    hideout: Arc<HideoutProgression>,
    excluded_task_ids: Arc<[String]>,
}

impl Generation {
    /// Build a generation from a snapshot pair. Both halves are built from
    /// scratch and stamped with `generation`.
    pub fn build(
        generation: u64,
        tasks: &RawTaskSnapshot,
        hideout: &RawHideoutSnapshot,
        config: &BuildConfig,
    ) -> Self {
        Self {
            generation,
            hideout: Arc::new(build_hideout(hideout, generation)),
            tasks: Arc::new(build_tasks(tasks, generation, config)),
            excluded_task_ids: config.excluded_task_ids.clone().into(),
        }
    }

    /// Monotonically increasing counter; 0 is the initial empty generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The task half, including the generation that built it.
    pub fn task_progression(&self) -> &TaskProgression {
        &self.tasks
    }

    /// The hideout half, including the generation that built it.
    pub fn hideout_progression(&self) -> &HideoutProgression {
        &self.hideout
    }

    pub fn task_graph(&self) -> &DependencyGraph {
        &self.tasks.graph
    }

    pub fn hideout_graph(&self) -> &DependencyGraph {
        &self.hideout.graph
    }

    pub fn tasks(&self) -> &[EnrichedTask] {
        &self.tasks.tasks
    }

    pub fn task(&self, id: &str) -> Option<&EnrichedTask> {
        self.tasks.task(id)
    }

    pub fn hideout_modules(&self) -> &[Arc<EnrichedModule>] {
        &self.hideout.modules
    }

    pub fn hideout_module(&self, id: &str) -> Option<&Arc<EnrichedModule>> {
        self.hideout.module(id)
    }

    pub fn needed_item_task_objectives(&self) -> &[NeededItem] {
        &self.tasks.indices.needed_items
    }

    pub fn needed_item_hideout_modules(&self) -> &[NeededItem] {
        &self.hideout.needed_items
    }

    pub fn map_to_task_ids(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.tasks.indices.map_to_task_ids
    }

    pub fn task_to_objective_locations(&self) -> &BTreeMap<String, Vec<ObjectiveLocation>> {
        &self.tasks.indices.task_to_objective_locations
    }

    pub fn task_to_objective_gps(&self) -> &BTreeMap<String, Vec<ObjectiveGps>> {
        &self.tasks.indices.task_to_objective_gps
    }

    pub fn alternative_tasks(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.tasks.indices.alternative_tasks
    }

    /// Task ids consumers should hide. Not applied to any graph or index.
    pub fn excluded_task_ids(&self) -> &[String] {
        &self.excluded_task_ids
    }

    pub fn is_excluded(&self, task_id: &str) -> bool {
        self.excluded_task_ids.iter().any(|id| id == task_id)
    }

    /// Warnings from both halves, hideout first.
    pub fn warnings(&self) -> impl Iterator<Item = &BuildWarning> {
        self.hideout.warnings.iter().chain(self.tasks.warnings.iter())
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Where the orchestrator is in its rebuild cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing has been built yet; the published generation is empty.
    Empty,
    /// A snapshot pair is being built.
    Building,
    /// The published generation is complete and consistent.
    Ready,
}

/// Events emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressionEvent {
    RebuildStarted {
        generation: u64,
    },
    RebuildCompleted {
        generation: u64,
        tasks: usize,
        modules: usize,
        warnings: usize,
    },
}

/// Pending events kept when nobody drains them. The oldest are dropped first.
pub const MAX_PENDING_EVENTS: usize = 256;

/// Owns the published generation and rebuilds it from new snapshots.
///
/// There is exactly one writer. Consumers take an `Arc<Generation>` from
/// [`Progression::published`] and keep reading it for as long as they like;
/// later rebuilds never touch it.
#[derive(Debug)]
pub struct Progression {
    config: BuildConfig,
    state: EngineState,
    published: Arc<Generation>,
    next_generation: u64,
    events: Vec<ProgressionEvent>,
}

impl Progression {
    /// Create an orchestrator with an empty published generation.
    pub fn new(config: BuildConfig) -> Self {
        let published = Arc::new(Generation {
            excluded_task_ids: config.excluded_task_ids.clone().into(),
            ..Generation::default()
        });
        Self {
            config,
            state: EngineState::Empty,
            published,
            next_generation: 1,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The currently published generation.
    pub fn published(&self) -> Arc<Generation> {
        Arc::clone(&self.published)
    }

    /// Rebuild from a new snapshot pair and publish the result.
    ///
    /// A `None` snapshot keeps that half of the previous generation as is,
    /// so the other half can still be refreshed. Always ends in
    /// [`EngineState::Ready`].
    pub fn rebuild(
        &mut self,
        tasks: Option<&RawTaskSnapshot>,
        hideout: Option<&RawHideoutSnapshot>,
    ) -> Arc<Generation> {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.state = EngineState::Building;
        self.push_event(ProgressionEvent::RebuildStarted { generation });
        tracing::info!(
            generation,
            tasks = tasks.is_some(),
            hideout = hideout.is_some(),
            "rebuilding progression"
        );

        let previous = &self.published;
        let hideout = match hideout {
            Some(snapshot) => Arc::new(build_hideout(snapshot, generation)),
            None => {
                tracing::debug!(generation, "no hideout snapshot, keeping previous hideout graph");
                Arc::clone(&previous.hideout)
            }
        };
        let tasks = match tasks {
            Some(snapshot) => Arc::new(build_tasks(snapshot, generation, &self.config)),
            None => {
                tracing::debug!(generation, "no task snapshot, keeping previous task graph");
                Arc::clone(&previous.tasks)
            }
        };

        let next = Arc::new(Generation {
            generation,
            tasks,
            hideout,
            excluded_task_ids: self.config.excluded_task_ids.clone().into(),
        });

        let warnings = next.warnings().count();
        self.push_event(ProgressionEvent::RebuildCompleted {
            generation,
            tasks: next.tasks().len(),
            modules: next.hideout_modules().len(),
            warnings,
        });
        tracing::info!(
            generation,
            tasks = next.tasks().len(),
            modules = next.hideout_modules().len(),
            warnings,
            "progression published"
        );

        self.published = Arc::clone(&next);
        self.state = EngineState::Ready;
        next
    }

    fn push_event(&mut self, event: ProgressionEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let overflow = self.events.len() + 1 - MAX_PENDING_EVENTS;
            self.events.drain(..overflow);
        }
        self.events.push(event);
    }

    /// Drain all pending events. At most [`MAX_PENDING_EVENTS`] are kept
    /// between drains.
    pub fn drain_events(&mut self) -> Vec<ProgressionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view of pending events.
    pub fn pending_events(&self) -> &[ProgressionEvent] {
        &self.events
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(BuildConfig::default())
    }
}

/// Build a standalone generation numbered `generation` from a snapshot pair
/// with the default config. The caller owns the numbering; only
/// [`Progression::rebuild`] counts generations itself.
pub fn rebuild(
    generation: u64,
    tasks: &RawTaskSnapshot,
    hideout: &RawHideoutSnapshot,
) -> Generation {
    Generation::build(generation, tasks, hideout, &BuildConfig::default())
}

// ===========================================================================
// Tests
// ===========================================================================
