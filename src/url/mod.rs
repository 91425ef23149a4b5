//! URL handling module for Docweave
//!
//! This module provides URL normalization, href resolution, same-origin
//! checks, include/exclude admission rules, and path-based categorization.

mod matcher;
mod normalize;
mod origin;

pub use matcher::{compile_patterns, UrlFilter};
pub use normalize::normalize_url;
pub use origin::{resolve_href, same_origin};

use url::Url;

/// Category assigned when a URL has no usable path segment
pub const DEFAULT_CATEGORY: &str = "general";

/// Derives a page category from its URL path
///
/// The category is the first path segment after the documentation prefix
/// (when the path starts with it), otherwise the first path segment.
///
/// # Examples
///
/// ```
/// use docweave::url::category_for_url;
///
/// assert_eq!(category_for_url("https://example.com/docs/api/products", "docs"), "api");
/// assert_eq!(category_for_url("https://example.com/guides/setup", "docs"), "guides");
/// assert_eq!(category_for_url("https://example.com/docs", "docs"), "general");
/// ```
pub fn category_for_url(url: &str, docs_prefix: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return DEFAULT_CATEGORY.to_string();
    };

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let candidate = match segments.first() {
        Some(first) if !docs_prefix.is_empty() && first.eq_ignore_ascii_case(docs_prefix) => {
            segments.get(1)
        }
        other => other,
    };

    candidate
        .map(|seg| seg.to_lowercase())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}
