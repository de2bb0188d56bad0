//! Build configuration.

use serde::{Deserialize, Serialize};

/// Options that shape a rebuild. Every field has a default, so an empty
/// config file is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Task ids consumers should treat as permanently hidden. Passed through
    /// to every generation; the engine does not filter the graph with it.
    pub excluded_task_ids: Vec<String>,

    /// Repeat the active-requirement pass until no new edges appear, so a
    /// chain of active requirements links transitively. Off by default.
    pub resolve_chained_active: bool,
}
