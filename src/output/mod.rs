//! Output module for crawl reports and query results
//!
//! This module handles:
//! - Generating markdown summaries of a crawl and the index built from it
//! - Rendering search hits, facets and schema lookups for the terminal
//! - Printing index statistics

mod report;
mod summary;

pub use report::{
    format_documents, format_facets, format_schema_matches, format_search_results,
    print_statistics,
};
pub use summary::{
    format_markdown_summary, generate_markdown_summary, CrawlSummary, OutputError, OutputResult,
};
