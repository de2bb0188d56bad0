//! Progression Core -- dependency graphs for quest and hideout progression.
//!
//! Turns flat quest and hideout-upgrade records from the content service into
//! two directed dependency graphs, computes transitive closures for every
//! node, and derives the indices progress views need.
//!
//! # Rebuild pipeline
//!
//! Each call to [`engine::Progression::rebuild`] runs, in order:
//!
//! 1. **Hideout** -- resolve station-level requirements to level ids, build
//!    the upgrade graph, enrich modules, and flatten item costs.
//! 2. **Tasks** -- link normal requirements, then link active requirements
//!    through the referenced task's predecessors, and enrich tasks.
//! 3. **Indices** -- needed items, map/objective locations, GPS markers, and
//!    alternative (mutually exclusive) tasks.
//! 4. **Publish** -- swap the published [`engine::Generation`].
//!
//! Malformed input never fails a rebuild. Each problem becomes a
//! [`warning::BuildWarning`] and the affected edge or entry is omitted.
//!
//! # Key Types
//!
//! - [`graph::DependencyGraph`] -- idempotent string-keyed directed graph.
//! - [`closure`] -- cycle-safe ancestor/descendant sets.
//! - [`raw`] -- snapshot records as delivered by the content service.
//! - [`enriched`] -- records with relations, and needed items.
//! - [`engine::Progression`] -- single-writer rebuild orchestrator.

pub mod closure;
pub mod config;
pub mod engine;
pub mod enriched;
pub mod graph;
pub mod hideout;
pub mod index;
pub mod raw;
pub mod task;
pub mod warning;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::BuildConfig;
pub use engine::{EngineState, Generation, Progression, ProgressionEvent, rebuild};
pub use warning::BuildWarning;
