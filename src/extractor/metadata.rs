//! Page metadata: category, tags, related pages, keywords, last update

use crate::extractor::text::{element_text, select_first, selector};
use crate::extractor::{PageMetadata, RelatedPage};
use crate::url::{category_for_url, resolve_href};
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// Tags at or above this length are treated as prose, not tags
const MAX_TAG_LEN: usize = 50;

const TAG_SELECTORS: &[&str] = &[".tag", ".tags a", ".badge", "[rel='tag']", ".label", ".chip"];

const RELATED_SELECTORS: &[&str] = &[
    ".related a",
    ".see-also a",
    "[class*='related'] a",
    ".next-steps a",
];

pub(crate) fn extract_metadata(
    document: &Html,
    url: &str,
    docs_prefix: &str,
    base: Option<&Url>,
) -> PageMetadata {
    PageMetadata {
        category: category_for_url(url, docs_prefix),
        tags: extract_tags(document),
        related_pages: extract_related(document, base),
        keywords: extract_keywords(document),
        last_updated: extract_last_updated(document),
    }
}

fn extract_tags(document: &Html) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for css in TAG_SELECTORS {
        let Some(sel) = selector(css) else { continue };
        for element in document.select(&sel) {
            let text = element_text(element);
            if text.is_empty() || text.chars().count() >= MAX_TAG_LEN {
                continue;
            }
            if seen.insert(text.clone()) {
                tags.push(text);
            }
        }
    }

    tags
}

fn extract_related(document: &Html, base: Option<&Url>) -> Vec<RelatedPage> {
    let mut seen = HashSet::new();
    let mut related = Vec::new();

    for css in RELATED_SELECTORS {
        let Some(sel) = selector(css) else { continue };
        for anchor in document.select(&sel) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let resolved = match base {
                Some(base) => resolve_href(href, base),
                None => Url::parse(href).ok(),
            };
            let Some(resolved) = resolved else { continue };

            let title = element_text(anchor);
            if title.is_empty() {
                continue;
            }

            let url = resolved.to_string();
            if seen.insert(url.clone()) {
                related.push(RelatedPage { title, url });
            }
        }
    }

    related
}

fn extract_keywords(document: &Html) -> Vec<String> {
    select_first(document, "meta[name='keywords']")
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| {
            content
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn extract_last_updated(document: &Html) -> Option<String> {
    let from_time = select_first(document, "time[datetime]")
        .and_then(|time| time.value().attr("datetime"))
        .map(str::trim)
        .filter(|v| !v.is_empty());

    from_time
        .or_else(|| {
            select_first(document, "meta[property='article:modified_time']")
                .and_then(|meta| meta.value().attr("content"))
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}
