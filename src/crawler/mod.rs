//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a rendering fallback
//! - Link harvesting from fetched HTML
//! - The breadth-first frontier and sitemap seeding
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod playground;
mod sitemap;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, needs_rendering, FetchError, Fetcher, HttpFetcher};
pub use frontier::{Frontier, QueuedUrl};
pub use parser::harvest_links;
pub use playground::{playground_fallback, PLAYGROUND_TITLE};
pub use sitemap::{discover_sitemap_urls, parse_sitemap, sitemap_candidates, Sitemap};

use crate::config::{Config, CrawlerConfig};
use crate::{ConfigError, ConfigResult};
use std::time::Duration;
use url::Url;

/// Parameters for one crawl
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Origin of the site; only same-origin links are followed
    pub base_url: Url,
    pub seeds: Vec<String>,
    pub max_depth: u32,
    pub max_pages: usize,
    /// Pause after each fresh fetch
    pub request_delay: Duration,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// Routes fetched through the rendering path
    pub interactive_patterns: Vec<String>,
    pub min_interactive_content: usize,
    pub respect_robots: bool,
    pub use_sitemap: bool,
    /// Product token matched against robots.txt user-agent groups
    pub robots_agent: String,
}

impl CrawlOptions {
    /// Options with the default crawler settings, seeded from `base_url`
    pub fn new(base_url: Url) -> Self {
        let defaults = CrawlerConfig::default();
        Self {
            seeds: vec![base_url.to_string()],
            base_url,
            max_depth: defaults.max_depth,
            max_pages: defaults.max_pages,
            request_delay: Duration::from_millis(defaults.request_delay),
            include_patterns: defaults.include_patterns,
            exclude_patterns: defaults.exclude_patterns,
            interactive_patterns: defaults.interactive_patterns,
            min_interactive_content: defaults.min_interactive_content,
            respect_robots: defaults.respect_robots,
            use_sitemap: true,
            robots_agent: "docweave".to_string(),
        }
    }

    /// Builds crawl options from a loaded configuration
    ///
    /// Without configured seeds the crawl starts at the documentation root
    /// (`{base-url}/{docs-prefix}`).
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        let invalid = |e: url::ParseError| {
            ConfigError::InvalidUrl(format!("{}: {}", config.site.base_url, e))
        };
        let base_url = Url::parse(&config.site.base_url).map_err(invalid)?;

        let seeds = if config.site.seeds.is_empty() {
            vec![base_url.join(&config.site.docs_prefix).map_err(invalid)?.to_string()]
        } else {
            config.site.seeds.clone()
        };

        let crawler = &config.crawler;
        Ok(Self {
            base_url,
            seeds,
            max_depth: crawler.max_depth,
            max_pages: crawler.max_pages,
            request_delay: Duration::from_millis(crawler.request_delay),
            include_patterns: crawler.include_patterns.clone(),
            exclude_patterns: crawler.exclude_patterns.clone(),
            interactive_patterns: crawler.interactive_patterns.clone(),
            min_interactive_content: crawler.min_interactive_content,
            respect_robots: crawler.respect_robots,
            use_sitemap: config.site.sitemap,
            robots_agent: config.user_agent.crawler_name.clone(),
        })
    }
}

/// Outcome of one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    /// Every URL admitted to the frontier
    pub discovered_urls: Vec<String>,
    /// Pages fetched, extracted and stored during this crawl
    pub crawled_urls: Vec<String>,
    /// Pages already present in the store
    pub cached_urls: Vec<String>,
    pub failed_urls: Vec<String>,
    pub duration: Duration,
    /// True when the crawl ended on a stop request
    pub stopped: bool,
}

impl CrawlResult {
    /// Number of URLs visited, whatever their outcome
    pub fn visited(&self) -> usize {
        self.crawled_urls.len() + self.cached_urls.len() + self.failed_urls.len()
    }
}
