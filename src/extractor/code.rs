//! Code blocks, embedded schema text and API endpoints

use crate::extractor::schema::{classify_all, dedupe_fragments, SchemaFragment, MIN_BLOCK_LEN};
use crate::extractor::text::{element_text, heading_level, selector};
use crate::extractor::{CodeExample, Endpoint};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use std::sync::LazyLock;

/// How many ancestor levels to climb looking for a heading before a block
const TITLE_SEARCH_DEPTH: usize = 3;

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', ')'];

static METHOD_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(GET|POST|PUT|PATCH|DELETE)\s+(/[\w\-./{}:]*)").expect("valid regex")
});
static STRING_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"|`([^`]*)`"#).expect("valid regex")
});
static SCHEMA_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(type|input|enum|interface|query|mutation)\b").expect("valid regex")
});

/// Builds the matcher for full URLs under the API host
pub(crate) fn api_url_pattern(api_host: &str) -> Option<Regex> {
    if api_host.is_empty() {
        return None;
    }
    Regex::new(&format!(
        r"(?i)https?://{}(?:/[\w\-./{{}}:%?=&]*)?",
        regex::escape(api_host)
    ))
    .ok()
}

/// Collects preformatted blocks and language-tagged code spans
///
/// Block text keeps its line structure. Spans already inside a `pre` are
/// covered by that block.
pub(crate) fn collect_code_blocks(document: &Html) -> Vec<CodeExample> {
    let mut blocks = Vec::new();

    if let Some(pre_selector) = selector("pre") {
        for pre in document.select(&pre_selector) {
            if let Some(block) = code_block(pre) {
                blocks.push(block);
            }
        }
    }

    if let Some(span_selector) = selector("code[class*='language-'], code[class*='lang-']") {
        for code in document.select(&span_selector) {
            let in_pre = code
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| a.value().name() == "pre");
            if in_pre {
                continue;
            }
            if let Some(block) = code_block(code) {
                blocks.push(block);
            }
        }
    }

    blocks
}

fn code_block(element: ElementRef<'_>) -> Option<CodeExample> {
    let code = element.text().collect::<String>().trim().to_string();
    if code.is_empty() {
        return None;
    }

    let language = declared_language(element).unwrap_or_else(|| {
        if classify_all(&code).is_empty() {
            "text".to_string()
        } else {
            "graphql".to_string()
        }
    });

    Some(CodeExample {
        language,
        title: block_title(element),
        description: block_description(element),
        code,
    })
}

/// Language from a `language-x`/`lang-x` class or `data-language`, on the
/// block or its inner `code` element
fn declared_language(element: ElementRef<'_>) -> Option<String> {
    let inner = selector("code").and_then(|sel| element.select(&sel).next());

    std::iter::once(element)
        .chain(inner)
        .find_map(|el| {
            let value = el.value();
            value
                .classes()
                .find_map(|c| c.strip_prefix("language-").or_else(|| c.strip_prefix("lang-")))
                .or_else(|| value.attr("data-language"))
                .map(str::trim)
                .filter(|lang| !lang.is_empty())
                .map(str::to_lowercase)
        })
}

/// Title from `data-title`/`title`, else the nearest preceding heading
fn block_title(element: ElementRef<'_>) -> Option<String> {
    let attr = element
        .value()
        .attr("data-title")
        .or_else(|| element.value().attr("title"))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(title) = attr {
        return Some(title.to_string());
    }

    let mut current = element;
    for _ in 0..TITLE_SEARCH_DEPTH {
        let heading = current
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| heading_level(el.value().name()).is_some());
        if let Some(heading) = heading {
            let text = element_text(heading);
            return (!text.is_empty()).then_some(text);
        }
        current = current.parent().and_then(ElementRef::wrap)?;
    }

    None
}

/// The paragraph immediately before the block (or before its wrapper)
fn block_description(element: ElementRef<'_>) -> Option<String> {
    let previous = element
        .prev_siblings()
        .find_map(ElementRef::wrap)
        .or_else(|| {
            element
                .parent()
                .and_then(ElementRef::wrap)
                .and_then(|parent| parent.prev_siblings().find_map(ElementRef::wrap))
        })?;

    if previous.value().name() != "p" {
        return None;
    }

    let text = element_text(previous);
    (!text.is_empty()).then_some(text)
}

/// String literals from inline scripts that look like embedded schema text
///
/// Server-rendered explorers ship their schema inside bootstrap scripts;
/// literals that hold a brace and a definition keyword are unescaped and
/// returned as classifier candidates.
pub(crate) fn script_schema_literals(document: &Html) -> Vec<String> {
    let Some(script_selector) = selector("script:not([src])") else {
        return Vec::new();
    };

    let mut literals = Vec::new();
    for script in document.select(&script_selector) {
        let source: String = script.text().collect();
        for caps in STRING_LITERAL_RE.captures_iter(&source) {
            let Some(raw) = caps.get(1).or_else(|| caps.get(2)) else {
                continue;
            };
            let raw = raw.as_str();
            if raw.len() < MIN_BLOCK_LEN || !raw.contains('{') || !SCHEMA_KEYWORD_RE.is_match(raw)
            {
                continue;
            }
            literals.push(unescape(raw));
        }
    }

    literals
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

/// Classifies every candidate and deduplicates by kind and name
pub(crate) fn extract_fragments(candidates: &[&str]) -> Vec<SchemaFragment> {
    let fragments = candidates
        .iter()
        .flat_map(|text| classify_all(text))
        .collect();
    dedupe_fragments(fragments)
}

/// Pattern-based endpoint extraction
///
/// `METHOD /path` tokens map onto the API host; full URLs under the API host
/// are POST when they name GraphQL and GET otherwise. When the text mentions
/// both "graphql" and the API host a GraphQL endpoint entry is synthesized.
pub(crate) fn extract_endpoints(
    text: &str,
    api_host: &str,
    api_url_pattern: Option<&Regex>,
) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();

    if !api_host.is_empty() {
        for caps in METHOD_PATH_RE.captures_iter(text) {
            let path = caps[2].trim_end_matches(TRAILING_PUNCTUATION);
            endpoints.push(Endpoint {
                method: caps[1].to_string(),
                url: format!("https://{}{}", api_host, path),
                description: None,
            });
        }
    }

    if let Some(pattern) = api_url_pattern {
        for m in pattern.find_iter(text) {
            let url = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            let method = if url.to_lowercase().contains("graphql") {
                "POST"
            } else {
                "GET"
            };
            endpoints.push(Endpoint {
                method: method.to_string(),
                url: url.to_string(),
                description: None,
            });
        }
    }

    let lower = text.to_lowercase();
    if !api_host.is_empty() && lower.contains("graphql") && lower.contains(api_host) {
        endpoints.push(graphql_endpoint(api_host));
    }

    dedupe_endpoints(endpoints)
}

/// The GraphQL endpoint entry for an API host
pub fn graphql_endpoint(api_host: &str) -> Endpoint {
    Endpoint {
        method: "POST".to_string(),
        url: format!("https://{}/graphql", api_host),
        description: Some("GraphQL API endpoint".to_string()),
    }
}

/// Keeps the first endpoint per (method, url), filling in a missing description
fn dedupe_endpoints(endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut kept: Vec<Endpoint> = Vec::new();

    for endpoint in endpoints {
        let key = (endpoint.method.clone(), endpoint.url.clone());
        match positions.get(&key) {
            Some(&idx) => {
                if kept[idx].description.is_none() {
                    kept[idx].description = endpoint.description;
                }
            }
            None => {
                positions.insert(key, kept.len());
                kept.push(endpoint);
            }
        }
    }

    kept
}
