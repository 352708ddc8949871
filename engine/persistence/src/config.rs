//! Configuration for the persistence layer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Base directory for persistence files
    pub data_dir: PathBuf,

    /// Snapshot configuration
    pub snapshot: SnapshotConfig,
}

/// Snapshot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Archive the previous version of a collection before overwriting it
    pub snapshot_on_write: bool,

    /// Maximum number of snapshots to keep per collection
    pub max_snapshots: usize,

    /// Whether to gzip snapshots
    pub compress: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("./data"), snapshot: SnapshotConfig::default() }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            snapshot_on_write: true,
            max_snapshots: 20, // A full regular season of weekly refreshes plus slack
            compress: true,
        }
    }
}

impl PersistenceConfig {
    /// Create a new configuration with custom data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), ..Default::default() }
    }

    /// Get the collections directory path
    pub fn collections_dir(&self) -> PathBuf {
        self.data_dir.join("collections")
    }

    /// Get the snapshots directory path
    pub fn snapshots_dir(&self) -> PathBuf {
        self.data_dir.join("snapshots")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }

        if self.snapshot.snapshot_on_write && self.snapshot.max_snapshots == 0 {
            return Err("Snapshot max_snapshots must be greater than 0".to_string());
        }

        Ok(())
    }
}
