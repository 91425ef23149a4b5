//! Storage module for fetched documents
//!
//! This module defines the [`DocumentStore`] collaborator used by the
//! crawler and the index rebuild, along with two implementations:
//! - [`SqliteStore`] persists documents in a SQLite database
//! - [`MemoryStore`] keeps them in memory (tests, dry runs)

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use schema::{schema_version, SCHEMA_VERSION};
pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, StorageError, StorageResult};

use crate::extractor::ExtractedContent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Opens or creates the SQLite document store at `path`
pub fn open_store(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}

/// One successful fetch of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub title: String,
    pub raw_html: String,
    pub fetched_at: DateTime<Utc>,
    /// SHA-256 of the extracted main text, hex encoded
    pub content_hash: String,
}

/// A fetched page together with the content extracted from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub page: FetchedPage,
    pub content: ExtractedContent,
}

impl StoredDocument {
    /// Builds a stored document fetched now
    pub fn new(url: &str, raw_html: &str, content: ExtractedContent) -> Self {
        Self {
            page: FetchedPage {
                url: url.to_string(),
                title: content.title.clone(),
                raw_html: raw_html.to_string(),
                fetched_at: Utc::now(),
                content_hash: content_hash(&content.main_text),
            },
            content,
        }
    }
}

/// Hex-encoded SHA-256 digest used for change detection
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
