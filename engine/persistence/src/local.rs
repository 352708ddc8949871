//! Local file-based persistence implementation

use crate::backend::LocalPersistence;
use crate::config::PersistenceConfig;
use crate::error::Result;

/// Create a new local persistence instance with default configuration
pub fn create_local_persistence(data_dir: impl Into<std::path::PathBuf>) -> Result<LocalPersistence> {
    LocalPersistence::with_default_config(data_dir)
}

/// Create a new local persistence instance with custom configuration
pub fn create_local_persistence_with_config(config: PersistenceConfig) -> Result<LocalPersistence> {
    LocalPersistence::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CollectionStore;
    use crate::error::PersistenceError;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_persistence_initialization() {
        let temp_dir = TempDir::new().unwrap();

        let mut persistence = create_local_persistence(temp_dir.path()).unwrap();
        persistence.initialize().await.unwrap();

        assert!(temp_dir.path().join("collections").exists());
        assert!(temp_dir.path().join("snapshots").exists());
    }

    #[tokio::test]
    async fn test_requires_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = create_local_persistence(temp_dir.path()).unwrap();

        let err = persistence.read_collection("teams").await.unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn test_missing_collection_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut persistence = create_local_persistence(temp_dir.path()).unwrap();
        persistence.initialize().await.unwrap();

        assert!(persistence.read_collection("teams").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_replaces_and_archives_previous() {
        let temp_dir = TempDir::new().unwrap();
        let mut persistence = create_local_persistence(temp_dir.path()).unwrap();
        persistence.initialize().await.unwrap();

        persistence.write_collection("teams", vec![json!({"identity": "brown-1"})]).await.unwrap();
        persistence.write_collection("teams", vec![json!({"identity": "red-1"})]).await.unwrap();

        let rows = persistence.read_collection("teams").await.unwrap();
        assert_eq!(rows, vec![json!({"identity": "red-1"})]);

        let archived = persistence.snapshots().unwrap().load_latest_snapshot("teams").unwrap().unwrap();
        assert_eq!(archived.rows, vec![json!({"identity": "brown-1"})]);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut persistence = create_local_persistence(temp_dir.path()).unwrap();
            persistence.initialize().await.unwrap();
            persistence.write_collection("cross_matchups", vec![json!({"a": 1})]).await.unwrap();
        }

        let mut reopened = create_local_persistence(temp_dir.path()).unwrap();
        reopened.initialize().await.unwrap();
        assert_eq!(reopened.read_collection("cross_matchups").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_array_file_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let mut persistence = create_local_persistence(temp_dir.path()).unwrap();
        persistence.initialize().await.unwrap();

        std::fs::write(temp_dir.path().join("collections").join("teams.json"), "{\"x\": 1}").unwrap();

        let err = persistence.read_collection("teams").await.unwrap_err();
        assert!(matches!(err, PersistenceError::Corruption(_)));
    }

    #[tokio::test]
    async fn test_snapshots_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = PersistenceConfig::new(temp_dir.path());
        config.snapshot.snapshot_on_write = false;

        let mut persistence = create_local_persistence_with_config(config).unwrap();
        persistence.initialize().await.unwrap();
        persistence.write_collection("teams", vec![json!(1)]).await.unwrap();
        persistence.write_collection("teams", vec![json!(2)]).await.unwrap();

        assert!(persistence.snapshots().is_none());
        assert!(!temp_dir.path().join("snapshots").exists());
    }
}
