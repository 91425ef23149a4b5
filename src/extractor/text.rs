//! Text helpers shared by the extraction heuristics

use scraper::{ElementRef, Html, Selector};

/// Elements whose text never contributes to extracted content
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg", "head"];

/// Elements rendered inline; all others are treated as blocks and separated by spaces
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "cite", "code", "em", "i", "kbd", "mark", "q", "s", "samp", "small",
    "span", "strong", "sub", "sup", "time", "u", "var",
];

/// Navigation and boilerplate elements stripped from main content
const BOILERPLATE_TAGS: &[&str] = &["nav", "aside", "header", "footer", "form", "button"];
const BOILERPLATE_ROLES: &[&str] = &["navigation", "banner", "contentinfo", "search"];
const BOILERPLATE_CLASSES: &[&str] = &[
    "sidebar",
    "toc",
    "table-of-contents",
    "breadcrumb",
    "breadcrumbs",
    "menu",
    "nav",
    "navbar",
    "navigation",
    "pagination",
];
const NAVIGATION_CLASSES: &[&str] = &[
    "sidebar",
    "toc",
    "table-of-contents",
    "menu",
    "nav",
    "navbar",
    "navigation",
];

/// Parses a CSS selector; the selector lists in this crate are static, so a
/// parse failure only drops that one strategy
pub(crate) fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Returns the first element matching `css`
pub(crate) fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    document.select(&sel).next()
}

/// Collects the visible text of an element, skipping subtrees for which
/// `skip` returns true, with whitespace collapsed
pub(crate) fn collect_text<F>(element: ElementRef<'_>, skip: &F) -> String
where
    F: Fn(&ElementRef<'_>) -> bool,
{
    let mut out = String::new();
    push_text(element, skip, &mut out);
    normalize_whitespace(&out)
}

/// Collects all visible text of an element
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collect_text(element, &keep_all)
}

fn keep_all(_: &ElementRef<'_>) -> bool {
    false
}

/// Collects visible text with navigation and boilerplate removed
pub(crate) fn content_text(element: ElementRef<'_>) -> String {
    collect_text(element, &is_boilerplate)
}

fn push_text<F>(element: ElementRef<'_>, skip: &F, out: &mut String)
where
    F: Fn(&ElementRef<'_>) -> bool,
{
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if INVISIBLE_TAGS.contains(&name) || skip(&child_el) {
                continue;
            }
            let block = !INLINE_TAGS.contains(&name);
            if block {
                out.push(' ');
            }
            push_text(child_el, skip, out);
            if block {
                out.push(' ');
            }
        }
    }
}

/// Returns true for elements laid out inline, such as links and spans
pub(crate) fn is_inline(element: &ElementRef<'_>) -> bool {
    INLINE_TAGS.contains(&element.value().name())
}

/// Returns true for navigation, sidebar and other page chrome
pub(crate) fn is_boilerplate(element: &ElementRef<'_>) -> bool {
    let value = element.value();

    if BOILERPLATE_TAGS.contains(&value.name()) {
        return true;
    }

    if let Some(role) = value.attr("role") {
        if BOILERPLATE_ROLES.contains(&role) {
            return true;
        }
    }

    value.classes().any(|c| BOILERPLATE_CLASSES.contains(&c))
}

/// Returns true for navigation containers only (nav, aside, sidebars, tables
/// of contents); page headers and footers are not included
pub(crate) fn is_navigation(element: &ElementRef<'_>) -> bool {
    let value = element.value();

    matches!(value.name(), "nav" | "aside")
        || value.attr("role") == Some("navigation")
        || value.classes().any(|c| NAVIGATION_CLASSES.contains(&c))
}

/// Returns true if any ancestor of the element is a navigation container
pub(crate) fn inside_navigation(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_navigation(&ancestor))
}

/// Returns the heading level (1-6) for `h1`..`h6` element names
pub(crate) fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Collapses whitespace runs into single spaces and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Converts heading text into a section id
///
/// Lowercases, collapses runs of non-alphanumeric characters into a single
/// hyphen and trims leading/trailing hyphens.
///
/// # Examples
///
/// ```
/// use docweave::extractor::slugify;
///
/// assert_eq!(slugify("Creating a Product (v2)"), "creating-a-product-v2");
/// assert_eq!(slugify("  --Hello, World!--  "), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Truncates to `max` characters, appending an ellipsis when shortened
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}
