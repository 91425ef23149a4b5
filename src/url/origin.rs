use url::Url;

/// Resolves an anchor href against the page it appears on
///
/// Handles absolute, protocol-relative (`//host/path`), root-relative
/// (`/path`) and relative (`path`, `../path`) forms. The fragment is stripped
/// from the result.
///
/// Returns `None` when the href should be discarded:
/// - empty or fragment-only hrefs (same-page anchors)
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - hrefs that do not resolve to an http(s) URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docweave::url::resolve_href;
///
/// let base = Url::parse("https://docs.example.com/docs/api/products").unwrap();
/// let resolved = resolve_href("../guides/intro#top", &base).unwrap();
/// assert_eq!(resolved.as_str(), "https://docs.example.com/docs/guides/intro");
/// ```
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}

/// Returns true when both URLs share scheme, host and port
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}
