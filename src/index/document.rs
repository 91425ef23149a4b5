//! Search documents and document-type classification

use crate::extractor::{ExtractedContent, SchemaFragment};
use crate::index::tokenize::keyword_terms;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Document type, classified from the URL shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Api,
    Graphql,
    Playground,
    Guide,
    General,
}

impl DocType {
    /// Classifies a URL by its path; the first matching rule wins
    ///
    /// The host is ignored, so `api-docs.example.com` does not make every
    /// page an API page. Strings that do not parse as URLs are matched whole.
    ///
    /// # Examples
    ///
    /// ```
    /// use docweave::index::DocType;
    ///
    /// assert_eq!(DocType::classify("https://x.com/graphql-playground"), DocType::Playground);
    /// assert_eq!(DocType::classify("https://x.com/docs/graphql/orders"), DocType::Graphql);
    /// assert_eq!(DocType::classify("https://x.com/docs/api/orders"), DocType::Api);
    /// assert_eq!(DocType::classify("https://x.com/docs/guides/setup"), DocType::Guide);
    /// assert_eq!(DocType::classify("https://x.com/docs/faq"), DocType::General);
    /// ```
    pub fn classify(url: &str) -> Self {
        let path = match Url::parse(url) {
            Ok(parsed) => parsed.path().to_lowercase(),
            Err(_) => url.to_lowercase(),
        };

        if path.contains("playground") || path.contains("explorer") {
            Self::Playground
        } else if path.contains("graphql") {
            Self::Graphql
        } else if path.contains("/api") {
            Self::Api
        } else if path.contains("guide") || path.contains("tutorial") {
            Self::Guide
        } else {
            Self::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Graphql => "graphql",
            Self::Playground => "playground",
            Self::Guide => "guide",
            Self::General => "general",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "graphql" => Ok(Self::Graphql),
            "playground" => Ok(Self::Playground),
            "guide" => Ok(Self::Guide),
            "general" => Ok(Self::General),
            other => Err(format!(
                "unknown document type '{}' (expected api, graphql, playground, guide or general)",
                other
            )),
        }
    }
}

/// Read-only projection of a stored page used for indexing and scoring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchDocument {
    pub url: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub section_titles: Vec<String>,
    pub schema_fragments: Vec<SchemaFragment>,
    pub category: String,
    pub doc_type: DocType,
    pub keywords: HashSet<String>,
}

impl SearchDocument {
    /// Projects extracted content into a search document
    ///
    /// Keywords come from the title, the URL and any declared page keywords.
    pub fn new(url: &str, content: &ExtractedContent) -> Self {
        let mut keywords = keyword_terms(&content.title);
        keywords.extend(keyword_terms(url));
        for declared in &content.metadata.keywords {
            keywords.extend(keyword_terms(declared));
        }

        Self {
            url: url.to_string(),
            title: content.title.clone(),
            description: content.description.clone(),
            body: content.main_text.clone(),
            section_titles: content.section_titles(),
            schema_fragments: content.schema_fragments.clone(),
            category: content.metadata.category.clone(),
            doc_type: DocType::classify(url),
            keywords,
        }
    }

    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schema_fragments.iter().map(|f| f.name.as_str())
    }
}
