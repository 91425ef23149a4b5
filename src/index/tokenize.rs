//! Term normalization shared by indexing and querying

use std::collections::HashSet;

/// Indexed keywords must be longer than this
const MIN_KEYWORD_LEN: usize = 3;

/// Query tokens must be longer than this
const MIN_QUERY_TOKEN_LEN: usize = 2;

const STOPWORDS: &[&str] = &[
    "that", "this", "with", "from", "into", "your", "have", "will", "https", "http", "html",
];

/// Lowercased alphanumeric runs
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Keyword terms for indexing: longer than three characters and not a stopword
///
/// # Examples
///
/// ```
/// use docweave::index::keyword_terms;
///
/// let terms = keyword_terms("Create a Product with https://example.com/docs/products");
/// assert!(terms.contains("create"));
/// assert!(terms.contains("products"));
/// assert!(!terms.contains("with"));
/// assert!(!terms.contains("com"));
/// ```
pub fn keyword_terms(text: &str) -> HashSet<String> {
    tokenize(text)
        .filter(|t| t.chars().count() > MIN_KEYWORD_LEN)
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Query tokens longer than two characters, deduplicated in order
pub fn query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(query)
        .filter(|t| t.chars().count() > MIN_QUERY_TOKEN_LEN)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
