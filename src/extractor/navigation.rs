//! Navigation link extraction

use crate::extractor::text::{element_text, selector};
use crate::extractor::NavLink;
use crate::url::resolve_href;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

/// Navigation containers in priority order
const NAV_SELECTORS: &[&str] = &[
    "nav.sidebar",
    ".sidebar nav",
    "[role='navigation']",
    ".docs-nav",
    ".sidebar",
    "nav",
    ".toc",
    ".menu",
];

const ACTIVE_CLASSES: &[&str] = &["active", "current", "selected", "is-active"];

/// Extracts links from the first navigation container that has any
///
/// Containers are not merged, so nested containers matched by several
/// selectors never produce duplicate trees.
pub(crate) fn extract_navigation(document: &Html, base: Option<&Url>) -> Vec<NavLink> {
    let Some(anchor_selector) = selector("a[href]") else {
        return Vec::new();
    };

    for css in NAV_SELECTORS {
        let Some(container_selector) = selector(css) else {
            continue;
        };

        for container in document.select(&container_selector) {
            let mut seen = HashSet::new();
            let links: Vec<NavLink> = container
                .select(&anchor_selector)
                .filter_map(|anchor| nav_link(anchor, base))
                .filter(|link| seen.insert(link.url.clone()))
                .collect();

            if !links.is_empty() {
                return links;
            }
        }
    }

    Vec::new()
}

fn nav_link(anchor: ElementRef<'_>, base: Option<&Url>) -> Option<NavLink> {
    let href = anchor.value().attr("href")?;
    let url = match base {
        Some(base) => resolve_href(href, base)?,
        None => Url::parse(href).ok()?,
    };

    let text = element_text(anchor);
    if text.is_empty() {
        return None;
    }

    Some(NavLink {
        text,
        url: url.to_string(),
        active: is_active(anchor),
    })
}

/// Active-state class or ARIA current-page marker on the link or its parent item
fn is_active(anchor: ElementRef<'_>) -> bool {
    if anchor.value().attr("aria-current") == Some("page") {
        return true;
    }

    if has_active_class(anchor) {
        return true;
    }

    anchor
        .parent()
        .and_then(ElementRef::wrap)
        .filter(|parent| parent.value().name() == "li")
        .is_some_and(has_active_class)
}

fn has_active_class(element: ElementRef<'_>) -> bool {
    element.value().classes().any(|c| ACTIVE_CLASSES.contains(&c))
}
