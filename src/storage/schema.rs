//! Database schema for the document store

/// Current schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: u32 = 1;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per fetched page, keyed by normalized URL
CREATE TABLE IF NOT EXISTS documents (
    url TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    fetched_at TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    raw_html TEXT NOT NULL,
    content_json TEXT NOT NULL,
    inserted_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_inserted ON documents(inserted_at);
CREATE INDEX IF NOT EXISTS idx_documents_hash ON documents(content_hash);
"#;

/// Initializes the database schema and records its version
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

/// Reads the schema version recorded in the database
pub fn schema_version(conn: &rusqlite::Connection) -> Result<u32, rusqlite::Error> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}
