//! Snapshot loading: reads task/hideout snapshots and build config from a
//! directory.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers. Files are looked up by base name:
//! `tasks.*`, `hideout.*`, and `progression.*`.

use progression_core::config::BuildConfig;
use progression_core::engine::{Generation, Progression};
use progression_core::raw::{RawHideoutSnapshot, RawTaskSnapshot};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Base name of the task snapshot file.
pub const TASKS_FILE: &str = "tasks";
/// Base name of the hideout snapshot file.
pub const HIDEOUT_FILE: &str = "hideout";
/// Base name of the build config file.
pub const CONFIG_FILE: &str = "progression";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a snapshot directory.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("snapshot directory not found: {dir}")]
    MissingDir { dir: PathBuf },

    #[error("snapshot file {file} is not .ron, .toml or .json")]
    UnknownExtension { file: PathBuf },

    /// More than one format exists for the same snapshot.
    #[error("conflicting snapshot formats for {base_name}: {first} and {second}")]
    AmbiguousSnapshot {
        base_name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("malformed snapshot {file}: {reason}")]
    Malformed { file: PathBuf, reason: String },

    #[error("failed to read snapshot {file}")]
    Read {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported snapshot file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    /// Every format, in lookup order.
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }

    /// Path of the `base_name` snapshot in `dir` if it used this format.
    fn path_in(self, dir: &Path, base_name: &str) -> PathBuf {
        dir.join(base_name).with_extension(self.extension())
    }
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    let ext = path.extension().and_then(|e| e.to_str());
    Format::ALL
        .into_iter()
        .find(|format| Some(format.extension()) == ext)
        .ok_or_else(|| DataLoadError::UnknownExtension {
            file: path.to_path_buf(),
        })
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Find the snapshot called `base_name` in `dir`, in whichever format it was
/// written. `Ok(None)` when there is none; an error when there are several.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = Format::ALL
        .into_iter()
        .map(|format| format.path_in(dir, base_name))
        .filter(|path| path.is_file());

    let Some(first) = present.next() else {
        return Ok(None);
    };
    match present.next() {
        Some(second) => Err(DataLoadError::AmbiguousSnapshot {
            base_name: base_name.to_string(),
            first,
            second,
        }),
        None => Ok(Some(first)),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| DataLoadError::Read {
        file: path.to_path_buf(),
        source,
    })?;
    let malformed = |reason: String| DataLoadError::Malformed {
        file: path.to_path_buf(),
        reason,
    };

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| malformed(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| malformed(e.to_string())),
        Format::Toml => toml::from_str(&content).map_err(|e| malformed(e.to_string())),
    }
}

fn load_optional<T: DeserializeOwned>(dir: &Path, base_name: &str) -> Result<Option<T>, DataLoadError> {
    match find_data_file(dir, base_name)? {
        Some(path) => {
            tracing::debug!(file = %path.display(), "loading snapshot file");
            deserialize_file(&path).map(Some)
        }
        None => {
            tracing::debug!(dir = %dir.display(), base_name, "no snapshot file");
            Ok(None)
        }
    }
}

// ===========================================================================
// Snapshot sets
// ===========================================================================

/// Everything found in one snapshot directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotSet {
    /// `None` when the directory has no task snapshot.
    pub tasks: Option<RawTaskSnapshot>,
    /// `None` when the directory has no hideout snapshot.
    pub hideout: Option<RawHideoutSnapshot>,
    /// Defaults when the directory has no config file.
    pub config: BuildConfig,
}

impl SnapshotSet {
    /// Create an orchestrator configured from this set and publish its first
    /// generation.
    pub fn into_progression(self) -> (Progression, Arc<Generation>) {
        let mut engine = Progression::new(self.config.clone());
        let generation = self.rebuild(&mut engine);
        (engine, generation)
    }

    /// Rebuild an existing orchestrator from this set. A missing snapshot
    /// keeps the orchestrator's previous half. The set's config is ignored;
    /// the orchestrator keeps the one it was created with.
    pub fn rebuild(&self, engine: &mut Progression) -> Arc<Generation> {
        engine.rebuild(self.tasks.as_ref(), self.hideout.as_ref())
    }
}

/// Load the task snapshot, hideout snapshot, and build config from `dir`.
///
/// Each file may be RON, TOML, or JSON. Any of them may be absent.
pub fn load_snapshot_dir(dir: &Path) -> Result<SnapshotSet, DataLoadError> {
    if !dir.is_dir() {
        return Err(DataLoadError::MissingDir {
            dir: dir.to_path_buf(),
        });
    }

    let set = SnapshotSet {
        tasks: load_optional(dir, TASKS_FILE)?,
        hideout: load_optional(dir, HIDEOUT_FILE)?,
        config: load_optional(dir, CONFIG_FILE)?.unwrap_or_default(),
    };

    tracing::info!(
        dir = %dir.display(),
        tasks = set.tasks.as_ref().map_or(0, |s| s.tasks.len()),
        stations = set.hideout.as_ref().map_or(0, |s| s.stations.len()),
        "snapshot directory loaded"
    );
    Ok(set)
}

// ===========================================================================
// Tests
// ===========================================================================
