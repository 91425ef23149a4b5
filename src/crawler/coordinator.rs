//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop, which:
//! - Seeds the frontier from configured seeds and sitemaps
//! - Checks robots.txt and the admission patterns
//! - Reuses stored documents instead of re-fetching them
//! - Fetches, extracts and persists new pages
//! - Harvests same-origin links into the frontier

use crate::crawler::frontier::Frontier;
use crate::crawler::parser::harvest_links;
use crate::crawler::playground::playground_fallback;
use crate::crawler::sitemap::{discover_sitemap_urls, sitemap_candidates};
use crate::crawler::{CrawlOptions, CrawlResult, Fetcher};
use crate::extractor::ContentExtractor;
use crate::robots::{fetch_robots, RobotsRules};
use crate::storage::{DocumentStore, StoredDocument};
use crate::url::{compile_patterns, normalize_url, same_origin, UrlFilter};
use crate::{ConfigResult, DocweaveError};
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Drives one crawl over a fetcher and a document store
///
/// The loop is sequential: one URL is processed at a time and fetches are
/// the only suspension points.
pub struct Coordinator<'a, F: Fetcher, S: DocumentStore> {
    fetcher: &'a F,
    store: &'a mut S,
    extractor: &'a ContentExtractor,
    options: CrawlOptions,
    filter: UrlFilter,
    interactive: Vec<Regex>,
    stop: Option<Arc<AtomicBool>>,
}

impl<'a, F: Fetcher, S: DocumentStore> Coordinator<'a, F, S> {
    /// Creates a new coordinator
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if an include, exclude or
    /// interactive pattern does not compile.
    pub fn new(
        fetcher: &'a F,
        store: &'a mut S,
        extractor: &'a ContentExtractor,
        options: CrawlOptions,
    ) -> ConfigResult<Self> {
        let filter = UrlFilter::new(&options.include_patterns, &options.exclude_patterns)?;
        let interactive = compile_patterns(&options.interactive_patterns)?;

        Ok(Self {
            fetcher,
            store,
            extractor,
            options,
            filter,
            interactive,
            stop: None,
        })
    }

    /// Installs a flag that ends the crawl at the next loop iteration once set
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Runs the crawl to completion
    ///
    /// Per-URL failures are recorded in the result and never abort the crawl.
    pub async fn run(&mut self) -> CrawlResult {
        let start_time = Instant::now();
        let base = self.options.base_url.clone();
        let agent = self.options.robots_agent.clone();

        tracing::info!("Starting crawl of {}", base);

        let robots = if self.options.respect_robots || self.options.use_sitemap {
            fetch_robots(self.fetcher, &base).await
        } else {
            RobotsRules::allow_all()
        };

        let delay = match robots.crawl_delay(&agent) {
            Some(robots_delay) if self.options.respect_robots => {
                self.options.request_delay.max(robots_delay)
            }
            _ => self.options.request_delay,
        };

        let mut frontier = Frontier::new();
        self.seed(&mut frontier, &base, &robots).await;

        let mut crawled_urls = Vec::new();
        let mut cached_urls = Vec::new();
        let mut stopped = false;

        loop {
            if self.stop_requested() {
                tracing::info!("Stop requested, ending crawl");
                stopped = true;
                break;
            }

            if frontier.visited_count() >= self.options.max_pages {
                tracing::info!("Reached page limit of {}", self.options.max_pages);
                break;
            }

            let Some(next) = frontier.next(self.options.max_depth) else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };
            let url = next.url;

            if self.options.respect_robots && !robots.is_allowed(&url, &agent) {
                tracing::debug!("URL {} disallowed by robots.txt", url);
                continue;
            }

            frontier.mark_visited(&url);

            match self.store.get(&url) {
                Ok(Some(stored)) => {
                    tracing::debug!("Reusing stored copy of {}", url);
                    cached_urls.push(url.clone());
                    self.enqueue_links(&mut frontier, &stored.page.raw_html, &url, next.depth, &base);
                }
                Ok(None) => {
                    match self.process_fresh(&url).await {
                        Ok(html) => {
                            crawled_urls.push(url.clone());
                            self.enqueue_links(&mut frontier, &html, &url, next.depth, &base);
                        }
                        Err(e) => {
                            tracing::warn!("Failed to crawl {}: {}", url, e);
                            frontier.mark_failed(&url);
                        }
                    }

                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) => {
                    tracing::warn!("Store lookup failed for {}: {}", url, e);
                    frontier.mark_failed(&url);
                }
            }

            let visited = frontier.visited_count();
            if visited % 10 == 0 {
                let rate = visited as f64 / start_time.elapsed().as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {:.2} pages/sec",
                    visited,
                    frontier.queue_len(),
                    rate
                );
            }
        }

        let duration = start_time.elapsed();
        tracing::info!(
            "Crawl finished: {} fetched, {} from store, {} failed in {:?}",
            crawled_urls.len(),
            cached_urls.len(),
            frontier.failed().len(),
            duration
        );

        CrawlResult {
            discovered_urls: frontier.discovered().to_vec(),
            crawled_urls,
            cached_urls,
            failed_urls: frontier.failed().to_vec(),
            duration,
            stopped,
        }
    }

    /// Enqueues configured seeds, then sitemap URLs, at depth 0
    ///
    /// Both go through the same origin and pattern checks as harvested links.
    async fn seed(&self, frontier: &mut Frontier, base: &Url, robots: &RobotsRules) {
        for seed in &self.options.seeds {
            match self.admit(seed, base) {
                Some(url) => {
                    frontier.enqueue(url, 0);
                }
                None => tracing::warn!("Seed {} is off-site or not admitted by the patterns", seed),
            }
        }

        if !self.options.use_sitemap {
            return;
        }

        let candidates = sitemap_candidates(base, &robots.sitemaps());
        let mut added = 0;
        for loc in discover_sitemap_urls(self.fetcher, &candidates).await {
            if let Some(url) = self.admit(&loc, base) {
                if frontier.enqueue(url, 0) {
                    added += 1;
                }
            }
        }
        if added > 0 {
            tracing::info!("Seeded {} URLs from sitemaps", added);
        }
    }

    /// Fetches, extracts and stores one page, returning its HTML
    async fn process_fresh(&mut self, url: &str) -> Result<String, DocweaveError> {
        let interactive = self.is_interactive(url);

        let html = if interactive {
            tracing::debug!("Fetching {} through the rendering path", url);
            self.fetcher.fetch_rendered(url).await?
        } else {
            self.fetcher.fetch(url).await?
        };

        let mut content = self.extractor.extract(&html, url);

        if interactive
            && content.main_text.trim().chars().count() < self.options.min_interactive_content
        {
            tracing::debug!("Using curated explorer content for {}", url);
            content = playground_fallback(
                url,
                self.extractor.api_host(),
                self.extractor.docs_prefix(),
            );
        }

        self.store.put(url, &StoredDocument::new(url, &html, content))?;
        Ok(html)
    }

    fn enqueue_links(
        &self,
        frontier: &mut Frontier,
        html: &str,
        page_url: &str,
        depth: u32,
        base: &Url,
    ) {
        let next_depth = depth + 1;
        if next_depth > self.options.max_depth {
            return;
        }

        let Ok(page) = Url::parse(page_url) else {
            return;
        };

        for link in harvest_links(html, &page) {
            if let Some(url) = self.admit(link.as_str(), base) {
                frontier.enqueue(url, next_depth);
            }
        }
    }

    /// Normalizes a discovered URL and applies the origin and pattern checks
    fn admit(&self, raw: &str, base: &Url) -> Option<String> {
        let url = normalize_url(raw).ok()?;

        if !same_origin(&url, base) {
            tracing::trace!("Skipping off-site URL {}", url);
            return None;
        }

        if !self.filter.admits(url.as_str()) {
            tracing::trace!("URL {} rejected by admission patterns", url);
            return None;
        }

        Some(url.to_string())
    }

    fn is_interactive(&self, url: &str) -> bool {
        self.interactive.iter().any(|re| re.is_match(url))
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
