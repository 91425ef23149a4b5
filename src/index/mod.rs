//! Scored inverted search index
//!
//! The index is built by adding [`SearchDocument`]s and answers keyword
//! queries, facet counts and schema-name lookups. It has no update or delete
//! operation: callers rebuild it wholesale after a crawl.
//!
//! # Scoring
//!
//! For each query token (longer than two characters):
//!
//! | Match                         | Points                  |
//! |-------------------------------|-------------------------|
//! | token in title                | +20                     |
//! | whole query equals the title  | +50 (once)              |
//! | token is a document keyword   | +10                     |
//! | token in a schema name        | +15                     |
//! | occurrence in the body        | +2 each, at most +10    |
//! | token in any section title    | +5                      |
//!
//! Zero-score documents are dropped; ties keep insertion order.

mod document;
mod snippet;
mod tokenize;

pub use document::{DocType, SearchDocument};
pub use snippet::{extract_snippet, SNIPPET_STRIDE, SNIPPET_WINDOW};
pub use tokenize::{keyword_terms, query_terms, tokenize};

use crate::extractor::SchemaFragment;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Default number of search results
pub const DEFAULT_LIMIT: usize = 10;

const TITLE_POINTS: u32 = 20;
const EXACT_TITLE_POINTS: u32 = 50;
const KEYWORD_POINTS: u32 = 10;
const SCHEMA_POINTS: u32 = 15;
const BODY_POINTS: u32 = 2;
const BODY_CAP: u32 = 10;
const SECTION_POINTS: u32 = 5;

/// Options for a search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: usize,
    pub category: Option<String>,
    pub doc_type: Option<DocType>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            category: None,
            doc_type: None,
        }
    }
}

impl SearchOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// A ranked search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub doc_type: DocType,
    pub score: u32,
    pub snippet: String,
}

/// A schema fragment found by name lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaMatch {
    pub url: String,
    pub page_title: String,
    pub fragment: SchemaFragment,
}

/// Document counts grouped by category and document type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<(String, usize)>,
    pub doc_types: Vec<(DocType, usize)>,
}

/// Index statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub keywords: usize,
    pub schema_names: usize,
    pub sections: usize,
    pub facets: Facets,
}

/// In-memory inverted index over search documents
#[derive(Debug, Default)]
pub struct SearchIndex {
    documents: Vec<SearchDocument>,
    keyword_postings: HashMap<String, Vec<usize>>,
    schema_postings: HashMap<String, Vec<usize>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[SearchDocument] {
        &self.documents
    }

    /// Adds a document and records its keyword and schema-name postings
    pub fn add_document(&mut self, document: SearchDocument) {
        let id = self.documents.len();

        for keyword in &document.keywords {
            self.keyword_postings
                .entry(keyword.clone())
                .or_default()
                .push(id);
        }

        for name in document.schema_names() {
            let postings = self.schema_postings.entry(name.to_lowercase()).or_default();
            if postings.last() != Some(&id) {
                postings.push(id);
            }
        }

        self.documents.push(document);
    }

    /// Removes every document and posting
    pub fn clear(&mut self) {
        self.documents.clear();
        self.keyword_postings.clear();
        self.schema_postings.clear();
    }

    /// Runs a scored keyword query
    ///
    /// # Examples
    ///
    /// ```
    /// use docweave::extractor::ExtractedContent;
    /// use docweave::index::{SearchDocument, SearchIndex, SearchOptions};
    ///
    /// let mut index = SearchIndex::new();
    /// let content = ExtractedContent {
    ///     title: "Product Mutations".to_string(),
    ///     ..ExtractedContent::default()
    /// };
    /// index.add_document(SearchDocument::new("https://x.com/docs/products", &content));
    ///
    /// let results = index.search("product", &SearchOptions::default());
    /// assert_eq!(results[0].title, "Product Mutations");
    /// ```
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let tokens = query_terms(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let query_lower = query.trim().to_lowercase();

        let mut scored: Vec<(u32, &SearchDocument)> = self
            .documents
            .iter()
            .filter(|doc| passes_filters(doc, options))
            .map(|doc| (score_document(doc, &tokens, &query_lower), doc))
            .filter(|(score, _)| *score > 0)
            .collect();

        // sort_by is stable, so ties keep insertion order
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(options.limit)
            .map(|(score, doc)| SearchResult {
                url: doc.url.clone(),
                title: doc.title.clone(),
                description: doc.description.clone(),
                category: doc.category.clone(),
                doc_type: doc.doc_type,
                score,
                snippet: extract_snippet(&doc.body, &tokens),
            })
            .collect()
    }

    /// Documents of the given type, in insertion order
    pub fn find_by_doc_type(&self, doc_type: DocType) -> Vec<&SearchDocument> {
        self.documents
            .iter()
            .filter(|doc| doc.doc_type == doc_type)
            .collect()
    }

    /// Schema fragments whose name contains `name`, case-insensitively
    pub fn find_by_schema_name(&self, name: &str) -> Vec<SchemaMatch> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut doc_ids: Vec<usize> = self
            .schema_postings
            .iter()
            .filter(|(schema_name, _)| schema_name.contains(&needle))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        doc_ids.sort_unstable();
        doc_ids.dedup();

        doc_ids
            .into_iter()
            .filter_map(|id| self.documents.get(id))
            .flat_map(|doc| {
                doc.schema_fragments
                    .iter()
                    .filter(|f| f.name.to_lowercase().contains(&needle))
                    .map(|f| SchemaMatch {
                        url: doc.url.clone(),
                        page_title: doc.title.clone(),
                        fragment: f.clone(),
                    })
            })
            .collect()
    }

    /// Category and document-type counts, most frequent first
    pub fn facets(&self) -> Facets {
        let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
        let mut doc_types: BTreeMap<DocType, usize> = BTreeMap::new();

        for doc in &self.documents {
            *categories.entry(doc.category.as_str()).or_default() += 1;
            *doc_types.entry(doc.doc_type).or_default() += 1;
        }

        let mut categories: Vec<(String, usize)> = categories
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1));

        let mut doc_types: Vec<(DocType, usize)> = doc_types.into_iter().collect();
        doc_types.sort_by(|a, b| b.1.cmp(&a.1));

        Facets {
            categories,
            doc_types,
        }
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.documents.len(),
            keywords: self.keyword_postings.len(),
            schema_names: self.schema_postings.len(),
            sections: self.documents.iter().map(|d| d.section_titles.len()).sum(),
            facets: self.facets(),
        }
    }
}

fn passes_filters(doc: &SearchDocument, options: &SearchOptions) -> bool {
    if let Some(category) = &options.category {
        if !doc.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }

    options.doc_type.map_or(true, |t| doc.doc_type == t)
}

fn score_document(doc: &SearchDocument, tokens: &[String], query_lower: &str) -> u32 {
    let title = doc.title.to_lowercase();
    let body = doc.body.to_lowercase();
    let schema_names: Vec<String> = doc.schema_names().map(str::to_lowercase).collect();
    let section_titles: Vec<String> = doc.section_titles.iter().map(|t| t.to_lowercase()).collect();

    let mut score = 0;

    if !query_lower.is_empty() && title == query_lower {
        score += EXACT_TITLE_POINTS;
    }

    for token in tokens {
        let token = token.as_str();

        if title.contains(token) {
            score += TITLE_POINTS;
        }
        if doc.keywords.contains(token) {
            score += KEYWORD_POINTS;
        }
        if schema_names.iter().any(|name| name.contains(token)) {
            score += SCHEMA_POINTS;
        }

        let occurrences = u32::try_from(body.matches(token).count()).unwrap_or(u32::MAX);
        score += occurrences.saturating_mul(BODY_POINTS).min(BODY_CAP);

        if section_titles.iter().any(|t| t.contains(token)) {
            score += SECTION_POINTS;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{classify, ExtractedContent, PageMetadata, Section};

    fn content(title: &str, body: &str, category: &str) -> ExtractedContent {
        ExtractedContent {
            title: title.to_string(),
            main_text: body.to_string(),
            metadata: PageMetadata {
                category: category.to_string(),
                ..PageMetadata::default()
            },
            ..ExtractedContent::default()
        }
    }

    fn index_of(docs: &[(&str, ExtractedContent)]) -> SearchIndex {
        let mut index = SearchIndex::new();
        for (url, content) in docs {
            index.add_document(SearchDocument::new(url, content));
        }
        index
    }

    fn score_for(index: &SearchIndex, query: &str, url: &str) -> u32 {
        index
            .search(query, &SearchOptions::with_limit(100))
            .into_iter()
            .find(|r| r.url == url)
            .map(|r| r.score)
            .unwrap_or(0)
    }

    #[test]
    fn test_title_match_outranks_body_mentions() {
        let index = index_of(&[
            (
                "https://x.com/docs/shipping/guide",
                content("Shipping Guide", "A product ships. Each product has a product weight.", "shipping"),
            ),
            (
                "https://x.com/docs/mutations",
                content("Product Mutations", "Change things.", "mutations"),
            ),
        ]);

        let results = index.search("product", &SearchOptions::with_limit(3));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Product Mutations");
        assert_eq!(results[1].title, "Shipping Guide");
    }

    #[test]
    fn test_exact_title_bonus() {
        let index = index_of(&[
            ("https://x.com/a", content("Order Status", "", "general")),
            ("https://x.com/b", content("Order Status Codes", "", "general")),
        ]);
        let exact = score_for(&index, "order status", "https://x.com/a");
        let partial = score_for(&index, "order status", "https://x.com/b");
        assert_eq!(exact, partial + EXACT_TITLE_POINTS);
    }

    #[test]
    fn test_exact_title_beats_body_only() {
        let body = "refund ".repeat(50);
        let index = index_of(&[
            ("https://x.com/z", content("Notes", &body, "general")),
            ("https://x.com/y", content("Refund", "", "general")),
        ]);
        let results = index.search("Refund", &SearchOptions::default());
        assert_eq!(results[0].url, "https://x.com/y");
    }

    #[test]
    fn test_body_score_is_capped_and_monotonic() {
        let mut previous = 0;
        for n in 0..10 {
            let body = "token ".repeat(n);
            let index = index_of(&[("https://x.com/p", content("Page", &body, "general"))]);
            let score = score_for(&index, "token", "https://x.com/p");
            assert!(score >= previous);
            assert!(score <= BODY_CAP);
            previous = score;
        }
        assert_eq!(previous, BODY_CAP);
    }

    #[test]
    fn test_schema_and_section_points() {
        let mut with_schema = content("Reference", "", "general");
        with_schema.schema_fragments = vec![classify("type Invoice {\n  id: ID!\n}").unwrap()];
        let mut with_section = content("Reference", "", "general");
        with_section.sections = vec![Section {
            id: "invoices".to_string(),
            title: "Invoices".to_string(),
            level: 2,
            body_text: String::new(),
            children: Vec::new(),
        }];

        let index = index_of(&[
            ("https://x.com/a", with_schema),
            ("https://x.com/b", with_section),
        ]);
        assert_eq!(score_for(&index, "invoice", "https://x.com/a"), SCHEMA_POINTS);
        assert_eq!(score_for(&index, "invoice", "https://x.com/b"), SECTION_POINTS);
    }

    #[test]
    fn test_keyword_points_from_url() {
        let index = index_of(&[("https://x.com/docs/webhooks", content("Events", "", "general"))]);
        assert_eq!(score_for(&index, "webhooks", "https://x.com/docs/webhooks"), KEYWORD_POINTS);
    }

    #[test]
    fn test_zero_scores_excluded_and_short_tokens_ignored() {
        let index = index_of(&[("https://x.com/a", content("Alpha", "beta", "general"))]);
        assert!(index.search("gamma", &SearchOptions::default()).is_empty());
        assert!(index.search("is a", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = index_of(&[
            ("https://x.com/1", content("Cart One", "", "general")),
            ("https://x.com/2", content("Cart Two", "", "general")),
            ("https://x.com/3", content("Cart Six", "", "general")),
        ]);
        let urls: Vec<_> = index
            .search("cart", &SearchOptions::default())
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, vec!["https://x.com/1", "https://x.com/2", "https://x.com/3"]);
    }

    #[test]
    fn test_limit_and_filters() {
        let index = index_of(&[
            ("https://x.com/docs/api/orders", content("Orders", "", "api")),
            ("https://x.com/docs/guides/orders", content("Orders Guide", "", "guides")),
            ("https://x.com/docs/api/refunds", content("Order Refunds", "", "api")),
        ]);

        assert_eq!(index.search("orders", &SearchOptions::with_limit(1)).len(), 1);

        let options = SearchOptions {
            category: Some("API".to_string()),
            ..SearchOptions::default()
        };
        assert!(index.search("order", &options).iter().all(|r| r.category == "api"));

        let options = SearchOptions {
            doc_type: Some(DocType::Guide),
            ..SearchOptions::default()
        };
        let results = index.search("order", &options);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_type, DocType::Guide);
    }

    #[test]
    fn test_facets_sorted_by_count() {
        let index = index_of(&[
            ("https://x.com/docs/api/a", content("A", "", "api")),
            ("https://x.com/docs/api/b", content("B", "", "api")),
            ("https://x.com/docs/guides/c", content("C", "", "guides")),
        ]);
        let facets = index.facets();
        assert_eq!(
            facets.categories,
            vec![("api".to_string(), 2), ("guides".to_string(), 1)]
        );
        assert_eq!(facets.doc_types, vec![(DocType::Api, 2), (DocType::Guide, 1)]);
    }

    #[test]
    fn test_rebuild_yields_identical_facets() {
        let docs = [
            ("https://x.com/docs/api/a", content("A", "", "api")),
            ("https://x.com/docs/graphql/b", content("B", "", "graphql")),
            ("https://x.com/playground", content("C", "", "playground")),
        ];
        let mut index = index_of(&docs);
        let before = index.facets();

        index.clear();
        assert!(index.is_empty());
        for (url, content) in &docs {
            index.add_document(SearchDocument::new(url, content));
        }
        assert_eq!(index.facets(), before);
    }

    #[test]
    fn test_find_by_schema_name() {
        let mut page = content("Products", "", "api");
        page.schema_fragments = vec![
            classify("type Product {\n  id: ID!\n}").unwrap(),
            classify("input ProductInput {\n  title: String\n}").unwrap(),
            classify("type Order {\n  id: ID!\n}").unwrap(),
        ];
        let index = index_of(&[("https://x.com/docs/api/products", page)]);

        let matches = index.find_by_schema_name("PRODUCT");
        let names: Vec<_> = matches.iter().map(|m| m.fragment.name.as_str()).collect();
        assert_eq!(names, vec!["Product", "ProductInput"]);
        assert!(index.find_by_schema_name("customer").is_empty());
    }

    #[test]
    fn test_find_by_doc_type_and_stats() {
        let mut page = content("Explorer", "", "playground");
        page.schema_fragments = vec![classify("type Query {\n  shop: Shop\n}").unwrap()];
        let index = index_of(&[
            ("https://x.com/graphql-playground", page),
            ("https://x.com/docs/guides/start", content("Start", "", "guides")),
        ]);

        let playgrounds = index.find_by_doc_type(DocType::Playground);
        assert_eq!(playgrounds.len(), 1);
        assert_eq!(playgrounds[0].title, "Explorer");

        let stats = index.stats();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.schema_names, 1);
        assert!(stats.keywords > 0);
    }
}
