//! Docweave: a documentation-site knowledge indexer
//!
//! This crate crawls a documentation website, extracts structured knowledge
//! from each page (sections, schema fragments, code samples, endpoints,
//! navigation) and serves keyword and faceted lookups from an in-memory index.

pub mod config;
pub mod crawler;
pub mod engine;
pub mod extractor;
pub mod index;
pub mod output;
pub mod robots;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Docweave operations
#[derive(Debug, Error)]
pub enum DocweaveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid URL pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Docweave operations
pub type Result<T> = std::result::Result<T, DocweaveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOptions, CrawlResult, Fetcher, HttpFetcher};
pub use engine::DocsEngine;
pub use extractor::{ContentExtractor, ExtractedContent, SchemaFragment, SchemaKind};
pub use index::{DocType, SearchIndex, SearchOptions, SearchResult};
pub use storage::{DocumentStore, MemoryStore, SqliteStore, StoredDocument};
