//! Sitemap discovery for seeding the frontier
//!
//! Sitemaps are best-effort. A missing or malformed sitemap yields no URLs
//! and is never reported as a failure.

use crate::crawler::Fetcher;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static LOC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<loc>\s*(?:<!\[CDATA\[)?\s*(.*?)\s*(?:\]\]>)?\s*</loc>")
        .expect("valid regex")
});

static SITEMAP_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<sitemapindex[\s>]").expect("valid regex"));

/// Parsed contents of one sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sitemap {
    /// A `<urlset>` of page URLs
    Pages(Vec<String>),
    /// A `<sitemapindex>` pointing at further sitemaps
    Index(Vec<String>),
}

/// Parses sitemap XML into page URLs or nested sitemap URLs
///
/// # Example
///
/// ```
/// use docweave::crawler::{parse_sitemap, Sitemap};
///
/// let xml = "<urlset><url><loc>https://x.com/docs/a?x=1&amp;y=2</loc></url></urlset>";
/// assert_eq!(
///     parse_sitemap(xml),
///     Sitemap::Pages(vec!["https://x.com/docs/a?x=1&y=2".to_string()])
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> Sitemap {
    let locs: Vec<String> = LOC_PATTERN
        .captures_iter(xml)
        .filter_map(|c| c.get(1))
        .map(|m| unescape_xml(m.as_str()))
        .filter(|loc| !loc.is_empty())
        .collect();

    if SITEMAP_INDEX.is_match(xml) {
        Sitemap::Index(locs)
    } else {
        Sitemap::Pages(locs)
    }
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Sitemap locations to try: `/sitemap.xml` plus any declared in robots.txt
pub fn sitemap_candidates(base: &Url, declared: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    base.join("/sitemap.xml")
        .ok()
        .map(|u| u.to_string())
        .into_iter()
        .chain(declared.iter().cloned())
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

/// Fetches every candidate sitemap and returns the page URLs found
///
/// Sitemap index files are followed one level deep.
pub async fn discover_sitemap_urls<F>(fetcher: &F, candidates: &[String]) -> Vec<String>
where
    F: Fetcher + ?Sized,
{
    let mut pages = Vec::new();

    for candidate in candidates {
        match load(fetcher, candidate).await {
            Some(Sitemap::Pages(urls)) => pages.extend(urls),
            Some(Sitemap::Index(nested)) => {
                for sitemap in &nested {
                    match load(fetcher, sitemap).await {
                        Some(Sitemap::Pages(urls)) => pages.extend(urls),
                        Some(Sitemap::Index(_)) => {
                            tracing::debug!("Ignoring nested sitemap index {}", sitemap);
                        }
                        None => {}
                    }
                }
            }
            None => {}
        }
    }

    let mut seen = HashSet::new();
    pages.retain(|u| seen.insert(u.clone()));
    tracing::debug!("Sitemaps yielded {} URLs", pages.len());
    pages
}

async fn load<F>(fetcher: &F, url: &str) -> Option<Sitemap>
where
    F: Fetcher + ?Sized,
{
    match fetcher.fetch_text(url).await {
        Ok(body) => Some(parse_sitemap(&body)),
        Err(e) => {
            tracing::debug!("Sitemap {} unavailable: {}", url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StaticFetcher(HashMap<String, String>);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.0.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc> https://x.com/docs/a </loc></url>
              <url><loc><![CDATA[https://x.com/docs/b]]></loc></url>
            </urlset>"#;
        assert_eq!(
            parse_sitemap(xml),
            Sitemap::Pages(vec![
                "https://x.com/docs/a".to_string(),
                "https://x.com/docs/b".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_index() {
        let xml = "<sitemapindex><sitemap><loc>https://x.com/s1.xml</loc></sitemap></sitemapindex>";
        assert_eq!(
            parse_sitemap(xml),
            Sitemap::Index(vec!["https://x.com/s1.xml".to_string()])
        );
    }

    #[test]
    fn test_garbage_yields_nothing() {
        assert_eq!(parse_sitemap("<html>not a sitemap</html>"), Sitemap::Pages(vec![]));
    }

    #[test]
    fn test_candidates() {
        let base = Url::parse("https://x.com/docs/start").unwrap();
        let candidates = sitemap_candidates(
            &base,
            &[
                "https://x.com/sitemap.xml".to_string(),
                "https://x.com/docs-sitemap.xml".to_string(),
            ],
        );
        assert_eq!(
            candidates,
            vec!["https://x.com/sitemap.xml", "https://x.com/docs-sitemap.xml"]
        );
    }

    #[tokio::test]
    async fn test_discover_follows_index_one_level() {
        let mut pages = HashMap::new();
        pages.insert(
            "https://x.com/sitemap.xml".to_string(),
            "<sitemapindex><sitemap><loc>https://x.com/s1.xml</loc></sitemap>\
             <sitemap><loc>https://x.com/missing.xml</loc></sitemap></sitemapindex>"
                .to_string(),
        );
        pages.insert(
            "https://x.com/s1.xml".to_string(),
            "<urlset><url><loc>https://x.com/docs/a</loc></url>\
             <url><loc>https://x.com/docs/a</loc></url></urlset>"
                .to_string(),
        );

        let fetcher = StaticFetcher(pages);
        let urls = discover_sitemap_urls(&fetcher, &["https://x.com/sitemap.xml".to_string()]).await;
        assert_eq!(urls, vec!["https://x.com/docs/a"]);
    }
}
