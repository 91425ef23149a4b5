//! Link harvesting from fetched HTML
//!
//! **Include:**
//! - `<a href="...">` anywhere in the document
//! - `<link rel="canonical" href="...">`
//!
//! **Exclude:**
//! - `<a href="..." download>`
//! - fragment-only hrefs and `javascript:`, `mailto:`, `tel:`, `data:` links
//!
//! Origin filtering is left to the caller.

use crate::url::resolve_href;
use scraper::{Html, Selector};
use url::Url;

/// Resolves every followable link on the page against `base`
///
/// Results keep document order and carry no fragment. Duplicates are left
/// in; the frontier ignores URLs it has already seen.
///
/// # Example
///
/// ```
/// use docweave::crawler::harvest_links;
/// use url::Url;
///
/// let html = r##"<a href="/docs/a">A</a><a href="#top">Top</a><a href="b#x">B</a>"##;
/// let base = Url::parse("https://docs.example.com/docs/").unwrap();
/// let links = harvest_links(html, &base);
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[1].as_str(), "https://docs.example.com/docs/b");
/// ```
pub fn harvest_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(anchor) = Selector::parse("a[href]") {
        for element in document.select(&anchor) {
            if element.value().attr("download").is_some() {
                continue;
            }
            if let Some(url) = element.value().attr("href").and_then(|h| resolve_href(h, base)) {
                links.push(url);
            }
        }
    }

    if let Ok(canonical) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical) {
            if let Some(url) = element.value().attr("href").and_then(|h| resolve_href(h, base)) {
                links.push(url);
            }
        }
    }

    links
}
