//! In-memory document store

use crate::storage::traits::{DocumentStore, StorageResult};
use crate::storage::StoredDocument;
use std::collections::HashMap;

/// Document store backed by a map, listing URLs in insertion order
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: HashMap<String, StoredDocument>,
    order: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn put(&mut self, url: &str, document: &StoredDocument) -> StorageResult<()> {
        if self
            .documents
            .insert(url.to_string(), document.clone())
            .is_none()
        {
            self.order.push(url.to_string());
        }
        Ok(())
    }

    fn get(&self, url: &str) -> StorageResult<Option<StoredDocument>> {
        Ok(self.documents.get(url).cloned())
    }

    fn has(&self, url: &str) -> StorageResult<bool> {
        Ok(self.documents.contains_key(url))
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        Ok(self.order.clone())
    }

    fn count(&self) -> StorageResult<usize> {
        Ok(self.documents.len())
    }
}
