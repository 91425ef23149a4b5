//! Docweave main entry point
//!
//! This is the command-line interface for the Docweave documentation indexer.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use docweave::config::{load_config_with_hash, Config};
use docweave::index::{DocType, SearchOptions, DEFAULT_LIMIT};
use docweave::output::{
    format_documents, format_facets, format_schema_matches, format_search_results,
    generate_markdown_summary, print_statistics, CrawlSummary,
};
use docweave::storage::open_store;
use docweave::{CrawlOptions, DocsEngine, HttpFetcher, SqliteStore};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Docweave: a documentation-site knowledge indexer
///
/// Docweave crawls a documentation site, extracts sections, schema
/// definitions, code samples and endpoints from each page, and answers
/// keyword, facet and schema queries over what it found.
#[derive(Parser, Debug)]
#[command(name = "docweave")]
#[command(version)]
#[command(about = "A documentation-site knowledge indexer", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Search the stored documents instead of crawling
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Maximum number of search results
    #[arg(long, default_value_t = DEFAULT_LIMIT, requires = "search")]
    limit: usize,

    /// Only return results in this category
    #[arg(long, requires = "search")]
    category: Option<String>,

    /// Only return results of this document type
    #[arg(long, value_name = "TYPE", requires = "search")]
    doc_type: Option<DocType>,

    /// Show category and document-type counts
    #[arg(long)]
    facets: bool,

    /// Look up schema definitions whose name contains NAME
    #[arg(long, value_name = "NAME")]
    schema: Option<String>,

    /// List every stored document of a type
    #[arg(long, value_name = "TYPE")]
    doc_type_list: Option<DocType>,

    /// Show index statistics
    #[arg(long)]
    stats: bool,
}

impl Cli {
    fn is_query(&self) -> bool {
        self.search.is_some()
            || self.facets
            || self.schema.is_some()
            || self.doc_type_list.is_some()
            || self.stats
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.is_query() {
        handle_queries(&cli, &config)
    } else {
        handle_crawl(&config, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docweave=info,warn"),
            1 => EnvFilter::new("docweave=debug,info"),
            2 => EnvFilter::new("docweave=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let options = CrawlOptions::from_config(config)?;

    println!("=== Docweave Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", options.base_url);
    println!("  API host: {}", config.site.api_host);
    println!("  Docs prefix: {}", config.site.docs_prefix);
    println!("  Sitemap: {}", if options.use_sitemap { "yes" } else { "no" });

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", options.max_depth);
    println!("  Max pages: {}", options.max_pages);
    println!("  Request delay: {}ms", options.request_delay.as_millis());
    println!("  Respect robots.txt: {}", options.respect_robots);
    println!("  Include patterns: {}", options.include_patterns.join(", "));
    println!("  Exclude patterns: {}", options.exclude_patterns.join(", "));
    println!("  Interactive patterns: {}", options.interactive_patterns.join(", "));

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    match &config.fetcher.render_endpoint {
        Some(endpoint) => println!("  Render endpoint: {}", endpoint),
        None => println!("  Render endpoint: none (light fetch only)"),
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\nSeeds ({}):", options.seeds.len());
    for seed in &options.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Opens the engine over the configured store and builds its index
fn open_engine(config: &Config) -> anyhow::Result<DocsEngine<HttpFetcher, SqliteStore>> {
    let fetcher = HttpFetcher::new(&config.user_agent, &config.fetcher)
        .context("failed to build HTTP client")?;
    let store = open_store(Path::new(&config.output.database_path))
        .with_context(|| format!("failed to open {}", config.output.database_path))?;

    Ok(DocsEngine::from_config(config, fetcher, store))
}

/// Handles the search and lookup modes over previously stored documents
fn handle_queries(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let mut engine = open_engine(config)?;
    let indexed = engine.rebuild_index().context("failed to build index")?;
    tracing::debug!("Indexed {} stored documents", indexed);

    if let Some(query) = &cli.search {
        let options = SearchOptions {
            limit: cli.limit,
            category: cli.category.clone(),
            doc_type: cli.doc_type,
        };
        print!("{}", format_search_results(query, &engine.search(query, &options)));
    }

    if cli.facets {
        print!("{}", format_facets(&engine.facets()));
    }

    if let Some(name) = &cli.schema {
        print!("{}", format_schema_matches(name, &engine.find_by_schema_name(name)));
    }

    if let Some(doc_type) = cli.doc_type_list {
        print!("{}", format_documents(doc_type, &engine.find_by_doc_type(doc_type)));
    }

    if cli.stats {
        print_statistics(&engine.stats());
    }

    Ok(())
}

/// Handles the main crawl operation, then rebuilds the index
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let options = CrawlOptions::from_config(config)?;
    let base_url = options.base_url.to_string();

    let stop = Arc::new(AtomicBool::new(false));
    let ctrl_c_stop = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current page");
            ctrl_c_stop.store(true, Ordering::Relaxed);
        }
    });

    let mut engine = open_engine(config)?.with_stop_flag(stop);

    let started_at = Utc::now();
    let result = engine.crawl(options).await?;
    let indexed = engine.rebuild_index().context("failed to build index")?;

    println!(
        "Crawled {} new pages ({} from store, {} failed); {} documents indexed",
        result.crawled_urls.len(),
        result.cached_urls.len(),
        result.failed_urls.len(),
        indexed
    );

    if let Some(path) = &config.output.summary_path {
        let summary = CrawlSummary::new(&base_url, started_at, &result, engine.stats())
            .with_config_hash(config_hash);
        generate_markdown_summary(&summary, Path::new(path))
            .with_context(|| format!("failed to write summary to {}", path))?;
        println!("✓ Summary exported to: {}", path);
    }

    Ok(())
}
