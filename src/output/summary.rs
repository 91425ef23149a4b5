//! Markdown crawl report
//!
//! Summarizes one crawl and the index built after it: what was fetched,
//! what came from the store, what failed, and what the index now holds.

use crate::crawler::CrawlResult;
use crate::index::IndexStats;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Failed URLs listed in the report before truncating
const MAX_LISTED_FAILURES: usize = 50;

/// Errors that can occur while writing reports
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything the crawl report shows
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: Option<String>,
    pub stopped: bool,

    pub pages_discovered: usize,
    pub pages_crawled: usize,
    pub pages_cached: usize,
    pub failed_urls: Vec<String>,

    pub index: IndexStats,
}

impl CrawlSummary {
    pub fn new(
        base_url: &str,
        started_at: DateTime<Utc>,
        result: &CrawlResult,
        index: IndexStats,
    ) -> Self {
        let finished_at = started_at
            + chrono::Duration::from_std(result.duration).unwrap_or_else(|_| chrono::Duration::zero());

        Self {
            base_url: base_url.to_string(),
            started_at,
            finished_at,
            config_hash: None,
            stopped: result.stopped,
            pages_discovered: result.discovered_urls.len(),
            pages_crawled: result.crawled_urls.len(),
            pages_cached: result.cached_urls.len(),
            failed_urls: result.failed_urls.clone(),
            index,
        }
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn pages_visited(&self) -> usize {
        self.pages_crawled + self.pages_cached + self.failed_urls.len()
    }

    /// Percentage of visited pages that were fetched or reused successfully
    pub fn success_rate(&self) -> f64 {
        let visited = self.pages_visited();
        if visited == 0 {
            return 0.0;
        }
        (self.pages_crawled + self.pages_cached) as f64 / visited as f64 * 100.0
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Writes the markdown report to `output_path`
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Docweave Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", summary.base_url));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Duration**: {} seconds\n", summary.duration_seconds()));
    let status = if summary.stopped { "stopped" } else { "completed" };
    md.push_str(&format!("- **Status**: {}\n", status));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Crawl\n\n");
    md.push_str("| Outcome | Pages |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Discovered | {} |\n", summary.pages_discovered));
    md.push_str(&format!("| Fetched | {} |\n", summary.pages_crawled));
    md.push_str(&format!("| From store | {} |\n", summary.pages_cached));
    md.push_str(&format!("| Failed | {} |\n\n", summary.failed_urls.len()));
    md.push_str(&format!("**Success Rate**: {:.1}%\n\n", summary.success_rate()));

    md.push_str("## Index\n\n");
    md.push_str(&format!("- **Documents**: {}\n", summary.index.documents));
    md.push_str(&format!("- **Keywords**: {}\n", summary.index.keywords));
    md.push_str(&format!("- **Schema names**: {}\n", summary.index.schema_names));
    md.push_str(&format!("- **Sections**: {}\n\n", summary.index.sections));

    if !summary.index.facets.categories.is_empty() {
        md.push_str("### Categories\n\n");
        md.push_str("| Category | Documents |\n");
        md.push_str("|----------|-----------|\n");
        for (category, count) in &summary.index.facets.categories {
            md.push_str(&format!("| {} | {} |\n", category, count));
        }
        md.push('\n');
    }

    if !summary.index.facets.doc_types.is_empty() {
        md.push_str("### Document Types\n\n");
        md.push_str("| Type | Documents |\n");
        md.push_str("|------|-----------|\n");
        for (doc_type, count) in &summary.index.facets.doc_types {
            md.push_str(&format!("| {} | {} |\n", doc_type, count));
        }
        md.push('\n');
    }

    if !summary.failed_urls.is_empty() {
        md.push_str("## Failed URLs\n\n");
        for url in summary.failed_urls.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!("- {}\n", url));
        }
        if summary.failed_urls.len() > MAX_LISTED_FAILURES {
            md.push_str(&format!(
                "\n... and {} more\n",
                summary.failed_urls.len() - MAX_LISTED_FAILURES
            ));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{DocType, Facets};
    use chrono::TimeZone;
    use std::time::Duration;

    fn create_test_summary() -> CrawlSummary {
        let result = CrawlResult {
            discovered_urls: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            crawled_urls: vec!["a".into(), "b".into()],
            cached_urls: vec!["c".into()],
            failed_urls: vec!["https://docs.example.com/docs/broken".into()],
            duration: Duration::from_secs(90),
            stopped: false,
        };
        let index = IndexStats {
            documents: 3,
            keywords: 42,
            schema_names: 5,
            sections: 12,
            facets: Facets {
                categories: vec![("api".to_string(), 2), ("guides".to_string(), 1)],
                doc_types: vec![(DocType::Api, 2), (DocType::Guide, 1)],
            },
        };
        let started = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        CrawlSummary::new("https://docs.example.com", started, &result, index)
    }

    #[test]
    fn test_summary_counts() {
        let summary = create_test_summary();
        assert_eq!(summary.pages_visited(), 4);
        assert_eq!(summary.success_rate(), 75.0);
        assert_eq!(summary.duration_seconds(), 90);
    }

    #[test]
    fn test_format_markdown_summary() {
        let markdown = format_markdown_summary(&create_test_summary().with_config_hash("abc123"));

        assert!(markdown.contains("# Docweave Crawl Summary"));
        assert!(markdown.contains("- **Config Hash**: abc123"));
        assert!(markdown.contains("| Fetched | 2 |"));
        assert!(markdown.contains("| From store | 1 |"));
        assert!(markdown.contains("**Success Rate**: 75.0%"));
        assert!(markdown.contains("| api | 2 |"));
        assert!(markdown.contains("| guide | 1 |"));
        assert!(markdown.contains("- https://docs.example.com/docs/broken"));
    }

    #[test]
    fn test_failed_list_is_truncated() {
        let mut summary = create_test_summary();
        summary.failed_urls = (0..60).map(|i| format!("https://x.com/{}", i)).collect();

        let markdown = format_markdown_summary(&summary);
        assert!(markdown.contains("https://x.com/49"));
        assert!(!markdown.contains("https://x.com/50\n"));
        assert!(markdown.contains("... and 10 more"));
    }

    #[test]
    fn test_generate_markdown_summary_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");

        generate_markdown_summary(&create_test_summary(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Docweave Crawl Summary"));
    }
}
