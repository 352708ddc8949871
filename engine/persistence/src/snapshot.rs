//! Collection snapshots
//!
//! Before a collection is overwritten, its previous contents are archived as a
//! snapshot. Collections are rewritten wholesale on every refresh, so this is
//! the only way to recover rows a bad refresh replaced.

use crate::config::SnapshotConfig;
use crate::error::{PersistenceError, Result};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// An archived version of one collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    /// Unique identifier for this snapshot
    pub id: Uuid,

    /// Collection the rows belong to
    pub collection: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// The collection contents at that point
    pub rows: Vec<serde_json::Value>,
}

/// Snapshot file information
#[derive(Debug, Clone)]
pub struct SnapshotFileInfo {
    pub path: PathBuf,
    pub snapshot_id: Uuid,
    pub taken_at: DateTime<Utc>,
}

/// Snapshot manager
pub struct SnapshotManager {
    config: SnapshotConfig,
    snapshots_dir: PathBuf,
}

impl SnapshotManager {
    /// Create a new snapshot manager
    pub fn new(config: SnapshotConfig, snapshots_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&snapshots_dir).map_err(PersistenceError::Io)?;

        Ok(Self { config, snapshots_dir })
    }

    /// Archive the given rows of a collection
    pub fn archive(&self, collection: &str, rows: Vec<serde_json::Value>) -> Result<Uuid> {
        let snapshot =
            CollectionSnapshot { id: Uuid::new_v4(), collection: collection.to_string(), taken_at: Utc::now(), rows };

        let path = self.write_snapshot_file(&snapshot)?;

        tracing::debug!(
            "Archived {} rows of '{}' as snapshot {} ({:?})",
            snapshot.rows.len(),
            collection,
            snapshot.id,
            path
        );

        self.cleanup_old_snapshots(collection)?;

        Ok(snapshot.id)
    }

    /// Snapshots of one collection, oldest first
    pub fn list_snapshots(&self, collection: &str) -> Result<Vec<SnapshotFileInfo>> {
        let mut snapshots = Vec::new();
        let prefix = format!("{collection}_");

        let entries = std::fs::read_dir(&self.snapshots_dir).map_err(PersistenceError::Io)?;

        for entry in entries {
            let entry = entry.map_err(PersistenceError::Io)?;
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            if !file_name.starts_with(&prefix) || !is_snapshot_file(file_name) {
                continue;
            }

            match self.load_snapshot(&path) {
                Ok(snapshot) if snapshot.collection == collection => {
                    snapshots.push(SnapshotFileInfo {
                        path,
                        snapshot_id: snapshot.id,
                        taken_at: snapshot.taken_at,
                    });
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable snapshot {:?}: {}", path, e),
            }
        }

        snapshots.sort_by_key(|s| s.taken_at);

        Ok(snapshots)
    }

    /// Load the most recent snapshot of a collection
    pub fn load_latest_snapshot(&self, collection: &str) -> Result<Option<CollectionSnapshot>> {
        match self.list_snapshots(collection)?.last() {
            Some(info) => Ok(Some(self.load_snapshot(&info.path)?)),
            None => Ok(None),
        }
    }

    /// Remove the oldest snapshots of a collection beyond the retention limit
    pub fn cleanup_old_snapshots(&self, collection: &str) -> Result<()> {
        let snapshots = self.list_snapshots(collection)?;

        if snapshots.len() <= self.config.max_snapshots {
            return Ok(());
        }

        let snapshots_to_remove = snapshots.len() - self.config.max_snapshots;

        for snapshot in snapshots.iter().take(snapshots_to_remove) {
            std::fs::remove_file(&snapshot.path).map_err(PersistenceError::Io)?;

            tracing::debug!("Removed old snapshot: {:?}", snapshot.path);
        }

        Ok(())
    }

    // Private methods

    fn write_snapshot_file(&self, snapshot: &CollectionSnapshot) -> Result<PathBuf> {
        let extension = if self.config.compress { "snapshot.gz" } else { "snapshot" };
        let filename = format!(
            "{}_{}_{}.{}",
            snapshot.collection,
            snapshot.taken_at.format("%Y%m%dT%H%M%S%9f"),
            snapshot.id.simple(),
            extension
        );
        let file_path = self.snapshots_dir.join(filename);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&file_path)
            .map_err(PersistenceError::Io)?;

        let writer = BufWriter::new(file);

        if self.config.compress {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            serde_json::to_writer(&mut encoder, snapshot).map_err(PersistenceError::Serialization)?;
            encoder.finish().map_err(PersistenceError::Io)?.flush().map_err(PersistenceError::Io)?;
        } else {
            let mut writer = writer;
            serde_json::to_writer(&mut writer, snapshot).map_err(PersistenceError::Serialization)?;
            writer.flush().map_err(PersistenceError::Io)?;
        }

        Ok(file_path)
    }

    fn load_snapshot(&self, path: &Path) -> Result<CollectionSnapshot> {
        let file = File::open(path).map_err(PersistenceError::Io)?;
        let reader = BufReader::new(file);

        let is_compressed = path.extension().and_then(|s| s.to_str()) == Some("gz");

        let mut contents = Vec::new();
        if is_compressed {
            GzDecoder::new(reader).read_to_end(&mut contents).map_err(PersistenceError::Io)?;
        } else {
            let mut reader = reader;
            reader.read_to_end(&mut contents).map_err(PersistenceError::Io)?;
        }

        serde_json::from_slice(&contents).map_err(PersistenceError::Serialization)
    }
}

fn is_snapshot_file(file_name: &str) -> bool {
    file_name.ends_with(".snapshot") || file_name.ends_with(".snapshot.gz")
}
