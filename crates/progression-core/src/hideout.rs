//! Hideout upgrade graph.
//!
//! Station-level requirements name a station and a level *number*, so each one
//! is resolved against the snapshot to a concrete level id before an edge is
//! added. Requirements that cannot be resolved are reported and skipped.

use crate::closure;
use crate::enriched::{EnrichedModule, NeededItem};
use crate::graph::DependencyGraph;
use crate::raw::RawHideoutSnapshot;
use crate::warning::{BuildWarning, Warnings};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Everything derived from one hideout snapshot.
#[derive(Debug, Clone, Default)]
pub struct HideoutProgression {
    /// Generation that built this half.
    pub built_in: u64,
    pub graph: DependencyGraph,
    pub modules: Vec<Arc<EnrichedModule>>,
    pub needed_items: Vec<NeededItem>,
    pub warnings: Vec<BuildWarning>,
}

impl HideoutProgression {
    /// Look up an enriched module by level id.
    pub fn module(&self, id: &str) -> Option<&Arc<EnrichedModule>> {
        self.modules.iter().find(|m| m.id() == id)
    }
}

/// Build the hideout graph, enriched modules, and hideout needed items.
pub fn build_hideout(snapshot: &RawHideoutSnapshot, generation: u64) -> HideoutProgression {
    let mut graph = DependencyGraph::new();
    let mut warnings = Warnings::default();

    for (_, level) in snapshot.levels() {
        graph.add_node(&level.id);
    }

    let stations: HashSet<&str> = snapshot.stations.iter().map(|s| s.id.as_str()).collect();
    let mut level_ids: HashMap<(&str, u32), &str> = HashMap::new();
    for (station, level) in snapshot.levels() {
        level_ids
            .entry((station.id.as_str(), level.level))
            .or_insert(level.id.as_str());
    }

    for (_, level) in snapshot.levels() {
        for requirement in &level.station_level_requirements {
            let station = requirement.station.id.as_str();
            if !stations.contains(station) {
                warnings.push(BuildWarning::DanglingStation {
                    level: level.id.clone(),
                    station: station.to_string(),
                });
                continue;
            }
            let Some(&required) = level_ids.get(&(station, requirement.level)) else {
                warnings.push(BuildWarning::UnresolvedLevel {
                    level: level.id.clone(),
                    station: station.to_string(),
                    required_level: requirement.level,
                });
                continue;
            };
            graph.add_edge(required, &level.id);
        }
    }

    let ids: Vec<&str> = snapshot.levels().map(|(_, l)| l.id.as_str()).collect();
    let relations = closure::relations_for(&graph, &ids);

    let mut modules = Vec::with_capacity(ids.len());
    let mut needed_items = Vec::new();

    for ((station, level), relations) in snapshot.levels().zip(relations) {
        if !graph.has_node(&level.id) {
            warnings.push(BuildWarning::MissingNode(level.id.clone()));
            continue;
        }

        let module = Arc::new(EnrichedModule {
            station_id: station.id.clone(),
            station_name: station.name.clone(),
            level: level.clone(),
            relations,
        });

        needed_items.extend(level.item_requirements.iter().map(|req| {
            NeededItem::HideoutModule {
                item: req.item.clone(),
                count: req.count,
                found_in_raid: req.found_in_raid,
                module: Arc::clone(&module),
            }
        }));
        modules.push(module);
    }

    tracing::debug!(
        generation,
        modules = modules.len(),
        edges = graph.edge_count(),
        "hideout graph built"
    );

    HideoutProgression {
        built_in: generation,
        graph,
        modules,
        needed_items,
        warnings: warnings.into_vec(),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
