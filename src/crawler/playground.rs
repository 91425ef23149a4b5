//! Curated content for the interactive API explorer
//!
//! The explorer renders almost everything client-side, so its extracted
//! text is often nearly empty. When that happens the crawler stores this
//! outline instead so the route stays searchable.

use crate::extractor::{graphql_endpoint, slugify, ExtractedContent, PageMetadata, Section};
use crate::url::category_for_url;

pub const PLAYGROUND_TITLE: &str = "GraphQL API Playground";

const PLAYGROUND_DESCRIPTION: &str =
    "Interactive explorer for composing and running GraphQL queries and mutations against the API.";

const OUTLINE: &[(&str, &str)] = &[
    (
        "Overview",
        "Write GraphQL operations in the editor, run them against the API and inspect the JSON response.",
    ),
    (
        "Authentication",
        "Requests from the playground are sent with the credentials of the signed-in session or an API key header.",
    ),
    (
        "Queries",
        "Queries read data. Select only the fields you need and pass arguments to filter results.",
    ),
    (
        "Mutations",
        "Mutations create, update or delete data and return the affected objects.",
    ),
    (
        "Schema Explorer",
        "Browse every type, field, enum and input object exposed by the GraphQL schema.",
    ),
];

/// Builds the fallback content for an explorer page at `url`
pub fn playground_fallback(url: &str, api_host: &str, docs_prefix: &str) -> ExtractedContent {
    let sections: Vec<Section> = OUTLINE
        .iter()
        .map(|(title, body)| Section {
            id: slugify(title),
            title: title.to_string(),
            level: 2,
            body_text: body.to_string(),
            children: Vec::new(),
        })
        .collect();

    let main_text = std::iter::once(PLAYGROUND_DESCRIPTION.to_string())
        .chain(OUTLINE.iter().map(|(title, body)| format!("{} {}", title, body)))
        .collect::<Vec<_>>()
        .join(" ");

    ExtractedContent {
        title: PLAYGROUND_TITLE.to_string(),
        description: PLAYGROUND_DESCRIPTION.to_string(),
        main_text,
        sections,
        api_endpoints: vec![graphql_endpoint(api_host)],
        metadata: PageMetadata {
            category: category_for_url(url, docs_prefix),
            ..PageMetadata::default()
        },
        ..ExtractedContent::default()
    }
}
