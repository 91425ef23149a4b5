//! Structured content extraction
//!
//! Turns raw HTML into [`ExtractedContent`]: title, description, main text,
//! a heading-based section tree, classified schema fragments, code samples,
//! API endpoints, navigation links and page metadata.
//!
//! Every heuristic here degrades to empty or default values instead of
//! failing, so [`ContentExtractor::extract`] is total over its input.

mod code;
mod metadata;
mod navigation;
mod schema;
mod sections;
mod text;

pub use code::graphql_endpoint;
pub use schema::{
    classify, classify_all, dedupe_fragments, SchemaField, SchemaFragment, SchemaKind,
    MIN_BLOCK_LEN,
};
pub use sections::extract_sections;
pub use text::{normalize_whitespace, slugify};

use crate::config::SiteConfig;
use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};
use text::{
    content_text, element_text, inside_navigation, is_boilerplate, is_inline, select_first,
    selector, truncate_chars,
};
use url::Url;

/// Title used when no title location yields text
pub const UNTITLED: &str = "Untitled Page";

/// A paragraph after the primary heading must exceed this to be a description
const MIN_LEAD_PARAGRAPH: usize = 50;

/// Description-like regions are truncated to this many characters
const MAX_DESCRIPTION: usize = 200;

const TITLE_SELECTORS: &[&str] = &["h1", "title", "[data-title]", ".page-title", ".doc-title"];

const DESCRIPTION_SELECTORS: &[&str] = &[
    ".description",
    ".lead",
    ".summary",
    ".intro",
    "[class*='description']",
];

/// Interactive schema explorer regions, checked before regular content.
/// Exact markers come first; the substring matches only count for block
/// containers outside navigation.
const PLAYGROUND_SELECTORS: &[&str] = &[
    "#graphiql",
    ".graphiql-container",
    "[class*='playground']",
    "[class*='explorer']",
    "[class*='graphiql']",
];

const MAIN_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role='main']",
    ".main-content",
    ".content",
    ".docs-content",
    "#content",
];

/// Structured content extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub title: String,
    pub description: String,
    pub main_text: String,
    pub sections: Vec<Section>,
    pub schema_fragments: Vec<SchemaFragment>,
    pub code_examples: Vec<CodeExample>,
    pub api_endpoints: Vec<Endpoint>,
    pub navigation_links: Vec<NavLink>,
    pub metadata: PageMetadata,
}

impl ExtractedContent {
    /// Titles of every section in the tree, in document order
    pub fn section_titles(&self) -> Vec<String> {
        fn walk(sections: &[Section], out: &mut Vec<String>) {
            for section in sections {
                out.push(section.title.clone());
                walk(&section.children, out);
            }
        }

        let mut titles = Vec::new();
        walk(&self.sections, &mut titles);
        titles
    }

    /// Number of sections in the tree, counting nested ones
    pub fn section_count(&self) -> usize {
        fn count(sections: &[Section]) -> usize {
            sections.iter().map(|s| 1 + count(&s.children)).sum()
        }
        count(&self.sections)
    }
}

/// A heading and the content under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// Heading level, 1 through 6
    pub level: u8,
    pub body_text: String,
    pub children: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExample {
    pub language: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An API endpoint mentioned on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub text: String,
    pub url: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPage {
    pub title: String,
    pub url: String,
}

/// Page metadata derived from the URL and tag-like elements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub category: String,
    pub tags: Vec<String>,
    pub related_pages: Vec<RelatedPage>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Extracts structured content from documentation pages
///
/// # Examples
///
/// ```
/// use docweave::extractor::ContentExtractor;
///
/// let extractor = ContentExtractor::new("api.example.com", "docs");
/// let content = extractor.extract(
///     "<html><body><h1>Products</h1><p>List products.</p></body></html>",
///     "https://docs.example.com/docs/products",
/// );
/// assert_eq!(content.title, "Products");
/// assert_eq!(content.metadata.category, "products");
/// ```
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    api_host: String,
    docs_prefix: String,
    api_url_pattern: Option<Regex>,
}

impl ContentExtractor {
    pub fn new(api_host: &str, docs_prefix: &str) -> Self {
        Self {
            api_host: api_host.to_lowercase(),
            docs_prefix: docs_prefix.to_string(),
            api_url_pattern: code::api_url_pattern(api_host),
        }
    }

    pub fn from_site(site: &SiteConfig) -> Self {
        Self::new(&site.api_host, &site.docs_prefix)
    }

    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    pub fn docs_prefix(&self) -> &str {
        &self.docs_prefix
    }

    /// Extracts structured content from a page's HTML
    pub fn extract(&self, html: &str, url: &str) -> ExtractedContent {
        let document = Html::parse_document(html);
        let base = Url::parse(url).ok();

        let main_text = extract_main_text(&document);
        let code_examples = code::collect_code_blocks(&document);

        let mut candidates: Vec<&str> = code_examples.iter().map(|c| c.code.as_str()).collect();
        let script_literals = code::script_schema_literals(&document);
        candidates.extend(script_literals.iter().map(String::as_str));
        let schema_fragments = code::extract_fragments(&candidates);

        let mut endpoint_text = main_text.clone();
        for example in &code_examples {
            endpoint_text.push('\n');
            endpoint_text.push_str(&example.code);
        }
        let api_endpoints = code::extract_endpoints(
            &endpoint_text,
            &self.api_host,
            self.api_url_pattern.as_ref(),
        );

        ExtractedContent {
            title: extract_title(&document),
            description: extract_description(&document),
            sections: extract_sections(&document),
            schema_fragments,
            code_examples: code_examples
                .into_iter()
                .filter(|c| c.code.chars().count() >= MIN_BLOCK_LEN)
                .collect(),
            api_endpoints,
            navigation_links: navigation::extract_navigation(&document, base.as_ref()),
            metadata: metadata::extract_metadata(&document, url, &self.docs_prefix, base.as_ref()),
            main_text,
        }
    }
}

/// First non-empty text from the title cascade
fn extract_title(document: &Html) -> String {
    TITLE_SELECTORS
        .iter()
        .filter_map(|css| select_first(document, css))
        .map(element_text)
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn extract_description(document: &Html) -> String {
    if let Some(meta) = select_first(document, "meta[name='description']") {
        let content = meta.value().attr("content").unwrap_or("").trim();
        if !content.is_empty() {
            return normalize_whitespace(content);
        }
    }

    if let Some(lead) = lead_paragraph(document) {
        return lead;
    }

    DESCRIPTION_SELECTORS
        .iter()
        .filter_map(|css| select_first(document, css))
        .map(element_text)
        .find(|t| !t.is_empty())
        .map(|t| truncate_chars(&t, MAX_DESCRIPTION))
        .unwrap_or_default()
}

/// The first paragraph after the primary heading, when long enough
fn lead_paragraph(document: &Html) -> Option<String> {
    let heading = select_first(document, "h1")?;
    let paragraph = heading
        .next_siblings()
        .filter_map(scraper::ElementRef::wrap)
        .find(|el| el.value().name() == "p")?;

    let text = element_text(paragraph);
    (text.chars().count() > MIN_LEAD_PARAGRAPH).then_some(text)
}

/// Main text cascade: explorer regions, content regions, then the body
fn extract_main_text(document: &Html) -> String {
    if let Some(text) = explorer_text(document) {
        return text;
    }

    let main = MAIN_SELECTORS
        .iter()
        .filter_map(|css| select_first(document, css))
        .map(content_text)
        .find(|t| !t.is_empty());
    if let Some(text) = main {
        return text;
    }

    select_first(document, "body")
        .map(content_text)
        .unwrap_or_else(|| content_text(document.root_element()))
}

/// Text of the first explorer container, ignoring links and chrome whose
/// class merely mentions a playground
fn explorer_text(document: &Html) -> Option<String> {
    PLAYGROUND_SELECTORS
        .iter()
        .filter_map(|css| selector(css))
        .find_map(|sel| {
            document
                .select(&sel)
                .filter(|el| !is_inline(el) && !is_boilerplate(el) && !inside_navigation(el))
                .map(element_text)
                .find(|t| !t.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ContentExtractor {
        ContentExtractor::new("api.example.com", "docs")
    }

    const DOC_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Products | Example Docs</title>
  <meta name="keywords" content="products, catalog">
</head>
<body>
  <nav class="sidebar">
    <a href="/docs/intro">Introduction</a>
    <a href="/docs/products" class="active">Products</a>
  </nav>
  <main>
    <h1>Products</h1>
    <p>The Products API lets you create, update and list items in your catalog with GraphQL.</p>
    <h2>Schema</h2>
    <pre><code class="language-graphql">type Product {
  id: ID!
  title: String # display name
}</code></pre>
    <h2>Endpoint</h2>
    <p>Send requests to https://api.example.com/graphql using POST /graphql.</p>
    <span class="tag">catalog</span>
  </main>
</body>
</html>"#;

    #[test]
    fn test_extract_full_page() {
        let content = extractor().extract(DOC_PAGE, "https://docs.example.com/docs/products");

        assert_eq!(content.title, "Products");
        assert!(content.description.starts_with("The Products API"));
        assert!(content.main_text.contains("create, update and list"));
        assert!(!content.main_text.contains("Introduction"));

        assert_eq!(content.sections.len(), 1);
        assert_eq!(content.section_titles(), vec!["Products", "Schema", "Endpoint"]);

        assert_eq!(content.schema_fragments.len(), 1);
        assert_eq!(content.schema_fragments[0].name, "Product");

        assert_eq!(content.code_examples.len(), 1);
        assert_eq!(content.code_examples[0].language, "graphql");
        assert_eq!(content.code_examples[0].title.as_deref(), Some("Schema"));

        assert_eq!(content.navigation_links.len(), 2);
        assert!(content.navigation_links[1].active);

        assert_eq!(content.metadata.category, "products");
        assert_eq!(content.metadata.tags, vec!["catalog"]);
        assert_eq!(content.metadata.keywords, vec!["products", "catalog"]);

        assert!(content
            .api_endpoints
            .iter()
            .any(|e| e.method == "POST" && e.url == "https://api.example.com/graphql"));
    }

    #[test]
    fn test_title_cascade() {
        let content = extractor().extract(
            "<html><head><title>Doc Title</title></head><body><p>x</p></body></html>",
            "https://docs.example.com/docs/a",
        );
        assert_eq!(content.title, "Doc Title");

        let content = extractor().extract(
            r#"<div class="page-title">Marked</div>"#,
            "https://docs.example.com/docs/a",
        );
        assert_eq!(content.title, "Marked");
    }

    #[test]
    fn test_untitled_fallback() {
        let content = extractor().extract("<p>nothing here</p>", "https://docs.example.com/x");
        assert_eq!(content.title, UNTITLED);
    }

    #[test]
    fn test_meta_description_wins() {
        let html = r#"<head><meta name="description" content="  From meta  "></head>
            <body><h1>T</h1><p>A fairly long lead paragraph that is well over fifty characters long.</p></body>"#;
        let content = extractor().extract(html, "https://docs.example.com/docs/a");
        assert_eq!(content.description, "From meta");
    }

    #[test]
    fn test_short_lead_paragraph_skipped() {
        let html = r#"<h1>T</h1><p>Too short.</p><div class="summary">Summary text</div>"#;
        let content = extractor().extract(html, "https://docs.example.com/docs/a");
        assert_eq!(content.description, "Summary text");
    }

    #[test]
    fn test_description_region_truncated() {
        let long = "word ".repeat(100);
        let html = format!(r#"<div class="lead">{}</div>"#, long);
        let content = extractor().extract(&html, "https://docs.example.com/docs/a");
        assert!(content.description.ends_with("..."));
        assert!(content.description.chars().count() <= MAX_DESCRIPTION + 3);
    }

    #[test]
    fn test_missing_description_is_empty() {
        let content = extractor().extract("<h1>T</h1>", "https://docs.example.com/docs/a");
        assert_eq!(content.description, "");
    }

    #[test]
    fn test_playground_region_preferred() {
        let html = r#"<body><main><p>Main text</p></main>
            <div class="graphiql-container">Explorer shell</div></body>"#;
        let content = extractor().extract(html, "https://docs.example.com/graphql-playground");
        assert_eq!(content.main_text, "Explorer shell");
    }

    #[test]
    fn test_playground_link_in_sidebar_ignored() {
        let html = r#"<body>
            <nav class="sidebar"><a class="playground-link" href="/playground">Try it</a></nav>
            <main><p>Orders are created with the createOrder mutation.</p></main>
            </body>"#;
        let content = extractor().extract(html, "https://docs.example.com/docs/orders");
        assert_eq!(content.main_text, "Orders are created with the createOrder mutation.");
    }

    #[test]
    fn test_inline_explorer_mention_ignored() {
        let html = r#"<body><main>
            <p>Open the <span class="explorer-hint">explorer</span> to run queries.</p>
            </main></body>"#;
        let content = extractor().extract(html, "https://docs.example.com/docs/queries");
        assert_eq!(content.main_text, "Open the explorer to run queries.");
    }

    #[test]
    fn test_body_fallback_strips_boilerplate() {
        let html = r#"<body><header>Site header</header><div>Body copy</div><footer>Footer</footer></body>"#;
        let content = extractor().extract(html, "https://docs.example.com/docs/a");
        assert_eq!(content.main_text, "Body copy");
    }

    #[test]
    fn test_malformed_html_degrades() {
        let content = extractor().extract("<<<>>><div", "not a url");
        assert_eq!(content.title, UNTITLED);
        assert!(content.sections.is_empty());
        assert!(content.navigation_links.is_empty());
        assert_eq!(content.metadata.category, "general");
    }

    #[test]
    fn test_section_count() {
        let content = extractor().extract(
            "<h1>A</h1><h2>B</h2><h3>C</h3><h2>D</h2>",
            "https://docs.example.com/docs/a",
        );
        assert_eq!(content.section_count(), 4);
    }
}
