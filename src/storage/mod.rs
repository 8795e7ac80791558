//! Storage module for the console's local key-value cache
//!
//! This module holds the small amount of state that outlives a session:
//! - Recently submitted URLs
//! - The last job list fetched from the backend

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KeyValueStore, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStore> {
    tracing::debug!("Opening key-value store at {}", path.display());
    SqliteStore::new(path)
}
