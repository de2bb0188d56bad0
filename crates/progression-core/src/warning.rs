//! Non-fatal diagnostics produced while building a generation.
//!
//! Nothing here ever aborts a rebuild. Each warning names the offending id and
//! the record that referenced it; the affected edge or index entry is omitted.

use serde::Serialize;

/// A problem found in a snapshot while building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum BuildWarning {
    #[error("task {task} requires unknown task {required}")]
    DanglingTaskRequirement { task: String, required: String },

    #[error("task {task} finish reward fails unknown task {failed}")]
    DanglingFailReward { task: String, failed: String },

    #[error("hideout level {level} requires unknown station {station}")]
    DanglingStation { level: String, station: String },

    #[error("hideout level {level} requires station {station} at level {required_level}, which does not exist")]
    UnresolvedLevel {
        level: String,
        station: String,
        required_level: u32,
    },

    #[error("objective {objective} of task {task} has no item or marker item")]
    ObjectiveWithoutItem { task: String, objective: String },

    #[error("{0} is missing from its graph")]
    MissingNode(String),
}

impl BuildWarning {
    /// Log this warning. Missing items are routine for most objective kinds
    /// and stay at debug level.
    pub(crate) fn log(&self) {
        match self {
            BuildWarning::ObjectiveWithoutItem { .. } => tracing::debug!(warning = %self),
            _ => tracing::warn!(warning = %self),
        }
    }
}

/// Collects warnings for one builder run, logging each as it arrives.
#[derive(Debug, Default)]
pub(crate) struct Warnings(Vec<BuildWarning>);

impl Warnings {
    pub(crate) fn push(&mut self, warning: BuildWarning) {
        warning.log();
        self.0.push(warning);
    }

    pub(crate) fn into_vec(self) -> Vec<BuildWarning> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_display_messages() {
        let w = BuildWarning::UnresolvedLevel {
            level: "lav-2".to_string(),
            station: "gen".to_string(),
            required_level: 3,
        };
        assert_eq!(
            w.to_string(),
            "hideout level lav-2 requires station gen at level 3, which does not exist"
        );

        let w = BuildWarning::DanglingTaskRequirement {
            task: "c".to_string(),
            required: "zz".to_string(),
        };
        assert_eq!(w.to_string(), "task c requires unknown task zz");
    }

    #[test]
    fn collector_keeps_order() {
        let mut warnings = Warnings::default();
        warnings.push(BuildWarning::MissingNode("a".to_string()));
        warnings.push(BuildWarning::MissingNode("b".to_string()));
        assert_eq!(
            warnings.into_vec(),
            vec![
                BuildWarning::MissingNode("a".to_string()),
                BuildWarning::MissingNode("b".to_string()),
            ]
        );
    }
}
