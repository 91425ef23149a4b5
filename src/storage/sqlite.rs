//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the DocumentStore
//! trait. Extracted content is stored as JSON next to the raw HTML.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::{FetchedPage, StoredDocument};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite document store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA mmap_size = 268435456;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn next_sequence(&self) -> StorageResult<i64> {
        let max: Option<i64> =
            self.conn
                .query_row("SELECT MAX(inserted_at) FROM documents", [], |row| row.get(0))?;
        Ok(max.unwrap_or(0) + 1)
    }
}

impl DocumentStore for SqliteStore {
    fn put(&mut self, url: &str, document: &StoredDocument) -> StorageResult<()> {
        let content_json = serde_json::to_string(&document.content)?;
        let page = &document.page;

        // Replacing a document keeps its original position in `list`
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT inserted_at FROM documents WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        let sequence = match existing {
            Some(sequence) => sequence,
            None => self.next_sequence()?,
        };

        self.conn.execute(
            "INSERT OR REPLACE INTO documents
                (url, title, fetched_at, content_hash, raw_html, content_json, inserted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                url,
                page.title,
                page.fetched_at.to_rfc3339(),
                page.content_hash,
                page.raw_html,
                content_json,
                sequence,
            ],
        )?;

        Ok(())
    }

    fn get(&self, url: &str) -> StorageResult<Option<StoredDocument>> {
        let row = self
            .conn
            .query_row(
                "SELECT url, title, fetched_at, content_hash, raw_html, content_json
                 FROM documents WHERE url = ?1",
                params![url],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((url, title, fetched_at, content_hash, raw_html, content_json)) = row else {
            return Ok(None);
        };

        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StorageError::Database(format!("bad fetched_at for {}: {}", url, e)))?;
        let content = serde_json::from_str(&content_json)?;

        Ok(Some(StoredDocument {
            page: FetchedPage {
                url,
                title,
                raw_html,
                fetched_at,
                content_hash,
            },
            content,
        }))
    }

    fn has(&self, url: &str) -> StorageResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE url = ?1",
            params![url],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM documents ORDER BY inserted_at")?;

        let urls = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(urls)
    }

    fn count(&self) -> StorageResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
