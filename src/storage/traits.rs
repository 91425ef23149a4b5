//! Storage traits and error types
//!
//! This module defines the trait interface for document stores and
//! associated error types.

use crate::storage::StoredDocument;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A key-value store of fetched documents keyed by URL
///
/// The crawler looks every URL up with `get` before fetching: a URL already
/// present is not fetched again, its stored HTML is reused for link
/// harvesting instead. `list` returns URLs in insertion order so that index
/// rebuilds are deterministic.
pub trait DocumentStore {
    /// Inserts or replaces the document stored under `url`
    fn put(&mut self, url: &str, document: &StoredDocument) -> StorageResult<()>;

    /// Gets the document stored under `url`
    fn get(&self, url: &str) -> StorageResult<Option<StoredDocument>>;

    /// Returns true if a document is stored under `url`
    fn has(&self, url: &str) -> StorageResult<bool>;

    /// Lists every stored URL
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Number of stored documents
    fn count(&self) -> StorageResult<usize> {
        Ok(self.list()?.len())
    }
}
