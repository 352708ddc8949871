//! Collection store trait and implementations

use crate::config::PersistenceConfig;
use crate::error::{PersistenceError, Result};
use crate::snapshot::SnapshotManager;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Abstract trait for collection stores
///
/// A collection is read and written as a whole. There is no concurrent-writer
/// protection: the last write wins.
#[async_trait::async_trait]
pub trait CollectionStore: Send + Sync {
    /// Initialize the store
    async fn initialize(&mut self) -> Result<()>;

    /// Read every row of a collection; a collection never written is empty
    async fn read_collection(&self, name: &str) -> Result<Vec<serde_json::Value>>;

    /// Replace the contents of a collection
    async fn write_collection(&self, name: &str, rows: Vec<serde_json::Value>) -> Result<()>;

    /// Get the configuration
    fn config(&self) -> &PersistenceConfig;
}

/// Read a collection as typed records, rejecting any row that does not parse
pub async fn read_records<T, S>(store: &S, name: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: CollectionStore + ?Sized,
{
    let rows = store.read_collection(name).await?;

    rows.into_iter()
        .enumerate()
        .map(|(row, value)| {
            serde_json::from_value(value).map_err(|e| PersistenceError::malformed(name, row, e.to_string()))
        })
        .collect()
}

/// Replace a collection with typed records
pub async fn write_records<T, S>(store: &S, name: &str, records: &[T]) -> Result<()>
where
    T: Serialize,
    S: CollectionStore + ?Sized,
{
    let rows = records
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(PersistenceError::Serialization)?;

    store.write_collection(name, rows).await
}

fn validate_collection_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(PersistenceError::invalid_operation(format!("Invalid collection name: '{name}'")))
    }
}

/// Local file-based store: one JSON array per collection
pub struct LocalPersistence {
    config: PersistenceConfig,
    snapshot_manager: Option<SnapshotManager>,
    write_lock: Mutex<()>,
    initialized: bool,
}

impl LocalPersistence {
    /// Create a new local store
    pub fn new(config: PersistenceConfig) -> Result<Self> {
        config.validate().map_err(PersistenceError::config)?;

        Ok(Self { config, snapshot_manager: None, write_lock: Mutex::new(()), initialized: false })
    }

    /// Create a new local store with default config
    pub fn with_default_config(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(PersistenceConfig::new(data_dir))
    }

    /// Access archived collection versions
    pub fn snapshots(&self) -> Option<&SnapshotManager> {
        self.snapshot_manager.as_ref()
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.config.collections_dir().join(format!("{name}.json"))
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(PersistenceError::invalid_operation("Persistence backend not initialized"))
        }
    }

    async fn load_rows(&self, name: &str) -> Result<Vec<serde_json::Value>> {
        let path = self.collection_path(name);

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::Io(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let value: serde_json::Value = serde_json::from_str(&contents)?;
        match value {
            serde_json::Value::Array(rows) => Ok(rows),
            _ => Err(PersistenceError::corruption(format!(
                "Collection file {:?} does not contain a JSON array",
                path
            ))),
        }
    }
}

#[async_trait::async_trait]
impl CollectionStore for LocalPersistence {
    async fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        tokio::fs::create_dir_all(self.config.collections_dir()).await?;

        if self.config.snapshot.snapshot_on_write {
            self.snapshot_manager =
                Some(SnapshotManager::new(self.config.snapshot.clone(), self.config.snapshots_dir())?);
        }

        self.initialized = true;

        tracing::info!("Local persistence backend initialized at: {:?}", self.config.data_dir);

        Ok(())
    }

    async fn read_collection(&self, name: &str) -> Result<Vec<serde_json::Value>> {
        self.ensure_initialized()?;
        validate_collection_name(name)?;

        let rows = self.load_rows(name).await?;
        tracing::debug!("Read {} rows from collection '{}'", rows.len(), name);
        Ok(rows)
    }

    async fn write_collection(&self, name: &str, rows: Vec<serde_json::Value>) -> Result<()> {
        self.ensure_initialized()?;
        validate_collection_name(name)?;

        let _guard = self.write_lock.lock().await;

        if let Some(snapshots) = &self.snapshot_manager {
            let previous = self.load_rows(name).await?;
            if !previous.is_empty() {
                snapshots.archive(name, previous)?;
            }
        }

        let path = self.collection_path(name);
        let tmp_path = path.with_extension("json.tmp");
        let row_count = rows.len();

        let contents = serde_json::to_string_pretty(&serde_json::Value::Array(rows))?;
        tokio::fs::write(&tmp_path, contents).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!("Wrote {} rows to collection '{}'", row_count, name);

        Ok(())
    }

    fn config(&self) -> &PersistenceConfig {
        &self.config
    }
}

/// In-memory store (for testing)
#[derive(Clone)]
pub struct InMemoryPersistence {
    config: PersistenceConfig,
    collections: Arc<Mutex<HashMap<String, Vec<serde_json::Value>>>>,
}

impl InMemoryPersistence {
    /// Create a new in-memory store
    pub fn new(config: PersistenceConfig) -> Self {
        Self { config, collections: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Create a new in-memory store with default config
    pub fn with_default_config() -> Self {
        Self::new(PersistenceConfig::default())
    }
}

impl Default for InMemoryPersistence {
    fn default() -> Self {
        Self::with_default_config()
    }
}

#[async_trait::async_trait]
impl CollectionStore for InMemoryPersistence {
    async fn initialize(&mut self) -> Result<()> {
        tracing::info!("In-memory persistence backend initialized");
        Ok(())
    }

    async fn read_collection(&self, name: &str) -> Result<Vec<serde_json::Value>> {
        validate_collection_name(name)?;

        let collections = self.collections.lock().await;
        Ok(collections.get(name).cloned().unwrap_or_default())
    }

    async fn write_collection(&self, name: &str, rows: Vec<serde_json::Value>) -> Result<()> {
        validate_collection_name(name)?;

        let mut collections = self.collections.lock().await;
        collections.insert(name.to_string(), rows);
        Ok(())
    }

    fn config(&self) -> &PersistenceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        week: u32,
        team: String,
    }

    #[tokio::test]
    async fn test_in_memory_roundtrip() {
        let store = InMemoryPersistence::default();

        assert!(store.read_collection("weekly_outcomes").await.unwrap().is_empty());

        let rows = vec![Row { week: 1, team: "brown-1".to_string() }];
        write_records(&store, "weekly_outcomes", &rows).await.unwrap();

        let back: Vec<Row> = read_records(&store, "weekly_outcomes").await.unwrap();
        assert_eq!(back, rows);
    }

    #[tokio::test]
    async fn test_malformed_row_is_rejected_with_position() {
        let store = InMemoryPersistence::default();
        store
            .write_collection("weekly_outcomes", vec![json!({"week": 1, "team": "brown-1"}), json!({"week": 2})])
            .await
            .unwrap();

        let err = read_records::<Row, _>(&store, "weekly_outcomes").await.unwrap_err();
        match err {
            PersistenceError::MalformedRecord { collection, row, .. } => {
                assert_eq!(collection, "weekly_outcomes");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_rejects_invalid_collection_names() {
        let store = InMemoryPersistence::default();
        assert!(store.read_collection("../etc").await.is_err());
        assert!(store.write_collection("", Vec::new()).await.is_err());
    }
}
