//! Engine facade tying the crawler, document store and search index together
//!
//! The engine owns its collaborators. Crawling writes to the store; the
//! index only changes through [`DocsEngine::rebuild_index`], which replaces
//! it wholesale from the store's contents.

use crate::config::Config;
use crate::crawler::{Coordinator, CrawlOptions, CrawlResult, Fetcher};
use crate::extractor::ContentExtractor;
use crate::index::{
    DocType, Facets, IndexStats, SchemaMatch, SearchDocument, SearchIndex, SearchOptions,
    SearchResult,
};
use crate::storage::{DocumentStore, StorageResult};
use crate::ConfigResult;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Crawl, search and lookup over one documentation site
///
/// # Example
///
/// ```no_run
/// use docweave::config::load_config;
/// use docweave::{CrawlOptions, DocsEngine, HttpFetcher, MemoryStore, SearchOptions};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("docweave.toml"))?;
/// let fetcher = HttpFetcher::new(&config.user_agent, &config.fetcher)?;
/// let mut engine = DocsEngine::from_config(&config, fetcher, MemoryStore::new());
///
/// engine.crawl(CrawlOptions::from_config(&config)?).await?;
/// engine.rebuild_index()?;
///
/// for hit in engine.search("create product", &SearchOptions::default()) {
///     println!("{} ({})", hit.title, hit.url);
/// }
/// # Ok(())
/// # }
/// ```
pub struct DocsEngine<F: Fetcher, S: DocumentStore> {
    fetcher: F,
    store: S,
    extractor: ContentExtractor,
    index: SearchIndex,
    stop: Option<Arc<AtomicBool>>,
}

impl<F: Fetcher, S: DocumentStore> DocsEngine<F, S> {
    pub fn new(fetcher: F, store: S, extractor: ContentExtractor) -> Self {
        Self {
            fetcher,
            store,
            extractor,
            index: SearchIndex::new(),
            stop: None,
        }
    }

    pub fn from_config(config: &Config, fetcher: F, store: S) -> Self {
        Self::new(fetcher, store, ContentExtractor::from_site(&config.site))
    }

    /// Shares a stop flag with every subsequent crawl
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Crawls the site, persisting each new page in the store
    ///
    /// Page-level failures land in [`CrawlResult::failed_urls`]. The only
    /// error is an options pattern that does not compile.
    pub async fn crawl(&mut self, options: CrawlOptions) -> ConfigResult<CrawlResult> {
        let mut coordinator =
            Coordinator::new(&self.fetcher, &mut self.store, &self.extractor, options)?;
        if let Some(stop) = &self.stop {
            coordinator = coordinator.with_stop_flag(Arc::clone(stop));
        }
        Ok(coordinator.run().await)
    }

    /// Replaces the index with one built from every stored document
    ///
    /// Returns the number of documents indexed.
    pub fn rebuild_index(&mut self) -> StorageResult<usize> {
        let mut index = SearchIndex::new();

        for url in self.store.list()? {
            match self.store.get(&url)? {
                Some(stored) => index.add_document(SearchDocument::new(&url, &stored.content)),
                None => tracing::debug!("{} vanished from the store during rebuild", url),
            }
        }

        self.index = index;
        tracing::info!("Indexed {} documents", self.index.len());
        Ok(self.index.len())
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        self.index.search(query, options)
    }

    pub fn facets(&self) -> Facets {
        self.index.facets()
    }

    pub fn find_by_schema_name(&self, name: &str) -> Vec<SchemaMatch> {
        self.index.find_by_schema_name(name)
    }

    pub fn find_by_doc_type(&self, doc_type: DocType) -> Vec<&SearchDocument> {
        self.index.find_by_doc_type(doc_type)
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
