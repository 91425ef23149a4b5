//! Schema fragment classifier
//!
//! Classifies a code-like text block as a typed GraphQL schema fragment. The
//! rules are evaluated in a fixed priority order and the first match wins:
//!
//! | Priority | Pattern                                 | Kind        |
//! |----------|-----------------------------------------|-------------|
//! | 1        | `type Query {`                          | `Query`     |
//! | 2        | `type Mutation {`                       | `Mutation`  |
//! | 3        | `input Name {`                          | `Input`     |
//! | 4        | `enum Name {`                           | `Enum`      |
//! | 5        | `type Name {` / `interface Name {`      | `Type` / `Interface` |
//! | 6        | `query Name? (args)? {` / `mutation ...`| `Query` / `Mutation` |
//!
//! Anything else is not a fragment. Classification never fails.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Blocks shorter than this are treated as inline code spans
pub const MIN_BLOCK_LEN: usize = 20;

/// Words that look like field names but start a definition
const STRUCTURAL_KEYWORDS: &[&str] = &["type", "input", "enum", "interface", "query", "mutation"];

static QUERY_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btype\s+Query\b[^{}]*\{").expect("valid regex"));
static MUTATION_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btype\s+Mutation\b[^{}]*\{").expect("valid regex"));
static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\binput\s+(\w+)[^{}]*\{").expect("valid regex"));
static ENUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\benum\s+(\w+)[^{}]*\{").expect("valid regex"));
static TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(type|interface)\s+(\w+)[^{}]*\{").expect("valid regex"));
static OPERATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(query|mutation)\b\s*(\w+)?\s*(?:\([^)]*\))?\s*\{").expect("valid regex")
});
static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s*(?:\([^)]*\))?\s*:\s*(\[?\w+!?\]?!?)(?:[ \t]*#[ \t]*([^\n]*))?")
        .expect("valid regex")
});
static DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:type|input|enum|interface)\s+\w+[^{}]*\{[^{}]*\}").expect("valid regex")
});
static ENUM_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*$").expect("valid regex"));

/// Kind of schema fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Type,
    Input,
    Enum,
    Interface,
    Query,
    Mutation,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Input => "input",
            Self::Enum => "enum",
            Self::Interface => "interface",
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field declared inside a schema fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub type_signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A classified block of schema-definition text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFragment {
    pub kind: SchemaKind,
    pub name: String,
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<SchemaField>>,
    /// Member names of an enum
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Classifies a single text block
///
/// Returns `None` when the block is too short or matches no rule.
///
/// # Examples
///
/// ```
/// use docweave::extractor::{classify, SchemaKind};
///
/// let fragment = classify("type Product { id: ID name: String }").unwrap();
/// assert_eq!(fragment.kind, SchemaKind::Type);
/// assert_eq!(fragment.name, "Product");
/// assert_eq!(fragment.fields.unwrap().len(), 2);
/// ```
pub fn classify(text: &str) -> Option<SchemaFragment> {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_BLOCK_LEN {
        return None;
    }

    let (kind, name, open_brace) = match_rule(trimmed)?;
    let body = brace_body(trimmed, open_brace);

    let fields = parse_fields(body);
    let values = if kind == SchemaKind::Enum {
        parse_enum_values(body)
    } else {
        Vec::new()
    };

    Some(SchemaFragment {
        kind,
        name,
        raw_text: trimmed.to_string(),
        fields: if fields.is_empty() { None } else { Some(fields) },
        values,
    })
}

/// Classifies a block that may hold several definitions
///
/// An SDL dump with more than one `type`/`input`/`enum`/`interface`
/// definition is split and each definition classified on its own; any other
/// block is classified whole.
pub fn classify_all(text: &str) -> Vec<SchemaFragment> {
    let definitions: Vec<&str> = DEFINITION_RE.find_iter(text).map(|m| m.as_str()).collect();

    if definitions.len() > 1 {
        definitions.into_iter().filter_map(classify).collect()
    } else {
        classify(text).into_iter().collect()
    }
}

/// Deduplicates fragments by `(kind, name)`, keeping the longest raw text
///
/// The surviving fragment takes the position of the first occurrence of its key.
pub fn dedupe_fragments(fragments: Vec<SchemaFragment>) -> Vec<SchemaFragment> {
    let mut positions: HashMap<(SchemaKind, String), usize> = HashMap::new();
    let mut kept: Vec<SchemaFragment> = Vec::new();

    for fragment in fragments {
        let key = (fragment.kind, fragment.name.clone());
        match positions.get(&key) {
            Some(&idx) => {
                if fragment.raw_text.len() > kept[idx].raw_text.len() {
                    kept[idx] = fragment;
                }
            }
            None => {
                positions.insert(key, kept.len());
                kept.push(fragment);
            }
        }
    }

    kept
}

/// Evaluates the classification rules in priority order
///
/// Returns the kind, name and byte offset of the opening brace.
fn match_rule(text: &str) -> Option<(SchemaKind, String, usize)> {
    if let Some(m) = QUERY_TYPE_RE.find(text) {
        return Some((SchemaKind::Query, "Query".to_string(), m.end() - 1));
    }

    if let Some(m) = MUTATION_TYPE_RE.find(text) {
        return Some((SchemaKind::Mutation, "Mutation".to_string(), m.end() - 1));
    }

    if let Some(caps) = INPUT_RE.captures(text) {
        let end = caps.get(0)?.end();
        return Some((SchemaKind::Input, caps[1].to_string(), end - 1));
    }

    if let Some(caps) = ENUM_RE.captures(text) {
        let end = caps.get(0)?.end();
        return Some((SchemaKind::Enum, caps[1].to_string(), end - 1));
    }

    if let Some(caps) = TYPE_RE.captures(text) {
        let end = caps.get(0)?.end();
        let kind = if &caps[1] == "interface" {
            SchemaKind::Interface
        } else {
            SchemaKind::Type
        };
        return Some((kind, caps[2].to_string(), end - 1));
    }

    if let Some(caps) = OPERATION_RE.captures(text) {
        let end = caps.get(0)?.end();
        let (kind, placeholder) = if &caps[1] == "mutation" {
            (SchemaKind::Mutation, "AnonymousMutation")
        } else {
            (SchemaKind::Query, "AnonymousQuery")
        };
        let name = caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| placeholder.to_string());
        return Some((kind, name, end - 1));
    }

    None
}

/// Returns the text between the brace at `open` and its matching close brace
///
/// An unbalanced block yields everything after the opening brace.
fn brace_body(text: &str, open: usize) -> &str {
    let start = open + 1;
    let mut depth = 1usize;

    for (offset, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &text[start..start + offset];
                }
            }
            _ => {}
        }
    }

    &text[start..]
}

/// Extracts `name: Type # description` fields from a definition body
fn parse_fields(body: &str) -> Vec<SchemaField> {
    FIELD_RE
        .captures_iter(body)
        .filter(|caps| !STRUCTURAL_KEYWORDS.contains(&&caps[1]))
        .map(|caps| SchemaField {
            name: caps[1].to_string(),
            type_signature: caps[2].to_string(),
            description: caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .filter(|d| !d.is_empty()),
        })
        .collect()
}

/// Extracts enum member names, ignoring comments and docstrings
fn parse_enum_values(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace)
        .filter(|token| ENUM_VALUE_RE.is_match(token))
        .filter(|token| !STRUCTURAL_KEYWORDS.contains(token))
        .map(str::to_string)
        .collect()
}
