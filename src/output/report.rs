//! Plain-text rendering of search and lookup results for the terminal

use crate::index::{DocType, Facets, IndexStats, SchemaMatch, SearchDocument, SearchResult};
use std::fmt::Write;

/// Formats ranked search hits, one numbered block per hit
pub fn format_search_results(query: &str, results: &[SearchResult]) -> String {
    let mut out = String::new();

    if results.is_empty() {
        let _ = writeln!(out, "No results for \"{}\"", query);
        return out;
    }

    let _ = writeln!(out, "{} result(s) for \"{}\"\n", results.len(), query);
    for (rank, hit) in results.iter().enumerate() {
        let _ = writeln!(out, "{}. {} [score {}]", rank + 1, hit.title, hit.score);
        let _ = writeln!(out, "   {}", hit.url);
        let _ = writeln!(out, "   {} / {}", hit.category, hit.doc_type);
        if !hit.snippet.is_empty() {
            let _ = writeln!(out, "   {}", hit.snippet);
        }
        out.push('\n');
    }

    out
}

pub fn format_facets(facets: &Facets) -> String {
    let mut out = String::from("Categories:\n");
    for (category, count) in &facets.categories {
        let _ = writeln!(out, "  {:<24} {}", category, count);
    }

    out.push_str("\nDocument types:\n");
    for (doc_type, count) in &facets.doc_types {
        let _ = writeln!(out, "  {:<24} {}", doc_type.as_str(), count);
    }

    out
}

/// Formats schema lookups, showing each fragment's declaration
pub fn format_schema_matches(name: &str, matches: &[SchemaMatch]) -> String {
    let mut out = String::new();

    if matches.is_empty() {
        let _ = writeln!(out, "No schema definitions matching \"{}\"", name);
        return out;
    }

    for found in matches {
        let fragment = &found.fragment;
        let _ = writeln!(out, "{} {} ({})", fragment.kind.as_str(), fragment.name, found.page_title);
        let _ = writeln!(out, "  {}", found.url);
        if let Some(fields) = &fragment.fields {
            for field in fields {
                let _ = writeln!(out, "    {}: {}", field.name, field.type_signature);
            }
        }
        if !fragment.values.is_empty() {
            let _ = writeln!(out, "    values: {}", fragment.values.join(", "));
        }
        out.push('\n');
    }

    out
}

pub fn format_documents(doc_type: DocType, documents: &[&SearchDocument]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {} document(s)", documents.len(), doc_type);
    for doc in documents {
        let _ = writeln!(out, "  {} - {}", doc.title, doc.url);
    }
    out
}

/// Prints index statistics to stdout in a formatted manner
pub fn print_statistics(stats: &IndexStats) {
    println!("=== Index Statistics ===\n");

    println!("Overview:");
    println!("  Documents: {}", stats.documents);
    println!("  Keywords: {}", stats.keywords);
    println!("  Schema names: {}", stats.schema_names);
    println!("  Sections: {}", stats.sections);
    println!();

    println!("Documents by Category:");
    for (category, count) in &stats.facets.categories {
        let percentage = if stats.documents > 0 {
            (*count as f64 / stats.documents as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", category, count, percentage);
    }
    println!();

    println!("Documents by Type:");
    for (doc_type, count) in &stats.facets.doc_types {
        println!("  {}: {}", doc_type, count);
    }
}
