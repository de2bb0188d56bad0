pub mod loader;

pub use loader::{DataLoadError, SnapshotSet, load_snapshot_dir};
