//! Storage traits and error types
//!
//! This module defines the trait interface for key-value store backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A persistent string-to-string store
///
/// Values are opaque to the store; callers encode them (JSON in practice).
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}
