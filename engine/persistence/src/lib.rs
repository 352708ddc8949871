//! # Persistence Layer
//!
//! This crate provides the tabular store behind the league dashboard. Data is
//! organised in named collections (`teams`, `cross_matchups`,
//! `weekly_outcomes`), each an ordered list of JSON records that is read and
//! written as a whole. Writes are last-writer-wins.
//!
//! ## Architecture
//!
//! - **CollectionStore**: Abstract trait for different storage backends
//! - **LocalPersistence**: One JSON file per collection under a data directory
//! - **InMemoryPersistence**: Process-local store for tests and dry runs
//! - **Snapshots**: The previous version of a collection is archived before
//!   each overwrite so a bad refresh can be rolled back by hand
//!
//! ## Usage
//!
//! ```rust
//! use persistence::{create_local_persistence, read_records, write_records, CollectionStore};
//! use tempfile::TempDir;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let temp_dir = TempDir::new()?;
//!     let mut store = create_local_persistence(temp_dir.path())?;
//!     store.initialize().await?;
//!
//!     write_records(&store, "notes", &["first".to_string()]).await?;
//!     let notes: Vec<String> = read_records(&store, "notes").await?;
//!     assert_eq!(notes, vec!["first".to_string()]);
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod local;
pub mod snapshot;

pub use backend::{read_records, write_records, CollectionStore, InMemoryPersistence, LocalPersistence};
pub use config::PersistenceConfig;
pub use error::{PersistenceError, Result};
pub use local::{create_local_persistence, create_local_persistence_with_config};
pub use snapshot::{CollectionSnapshot, SnapshotManager};
