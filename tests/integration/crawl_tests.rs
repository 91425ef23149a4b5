//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock documentation sites and run the
//! full crawl, store and index cycle end-to-end over real HTTP.

use docweave::config::{parse_config, Config};
use docweave::index::{DocType, SearchOptions};
use docweave::{CrawlOptions, DocsEngine, DocumentStore, HttpFetcher, MemoryStore, SqliteStore};
use std::collections::HashSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for a site served at `base_url`
fn create_test_config(base_url: &str, seeds: &[String], extra_crawler: &str) -> Config {
    let seeds = seeds
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(", ");

    parse_config(&format!(
        r#"
        [site]
        base-url = "{base_url}"
        api-host = "api.example.com"
        seeds = [{seeds}]

        [crawler]
        request-delay = 0
        {extra_crawler}

        [user-agent]
        crawler-name = "TestBot"
        crawler-version = "1.0.0"
        contact-url = "https://example.com/contact"
        contact-email = "test@example.com"

        [output]
        database-path = "./unused.db"
        "#
    ))
    .expect("valid test config")
}

fn engine<S: DocumentStore>(config: &Config, store: S) -> DocsEngine<HttpFetcher, S> {
    let fetcher = HttpFetcher::new(&config.user_agent, &config.fetcher).expect("client");
    DocsEngine::from_config(config, fetcher, store)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Number of GET requests the server received for `route`
async fn hits(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

fn doc_page(title: &str, body: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<li><a href="{}">{}</a></li>"#, l, l))
        .collect();
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <main><h1>{title}</h1><p>{body}</p><ul>{anchors}</ul></main>
        </body></html>"#
    )
}

#[tokio::test]
async fn test_full_crawl_and_search() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_page(
        &server,
        "/docs",
        doc_page(
            "Developer Docs",
            "Welcome to the developer documentation.",
            &["/docs/api/products", "/docs/guides/checkout", "/docs/missing", "/about"],
        ),
    )
    .await;
    mount_page(
        &server,
        "/docs/api/products",
        r#"<html><head><title>Products API</title></head><body><main>
            <h1>Products API</h1>
            <p>Fetch products through the GraphQL endpoint.</p>
            <h2>Product</h2>
            <pre><code class="language-graphql">type Product {
  id: ID!
  title: String!
  status: ProductStatus!
}</code></pre>
            <pre><code class="language-graphql">enum ProductStatus {
  ACTIVE
  ARCHIVED
  DRAFT
}</code></pre>
        </main></body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/docs/guides/checkout",
        doc_page("Checkout Guide", "Build a checkout flow step by step.", &[]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = create_test_config(&base, &[format!("{}/docs", base)], "");
    let mut engine = engine(&config, MemoryStore::new());

    let result = engine
        .crawl(CrawlOptions::from_config(&config).unwrap())
        .await
        .unwrap();

    assert_eq!(result.crawled_urls.len(), 3);
    assert_eq!(result.failed_urls, vec![format!("{}/docs/missing", base)]);
    assert_eq!(hits(&server, "/about").await, 0);

    assert_eq!(engine.rebuild_index().unwrap(), 3);

    let results = engine.search("product", &SearchOptions::default());
    assert_eq!(results[0].url, format!("{}/docs/api/products", base));
    assert_eq!(results[0].doc_type, DocType::Api);

    let matches = engine.find_by_schema_name("productstatus");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].fragment.values, vec!["ACTIVE", "ARCHIVED", "DRAFT"]);

    let guides = engine.find_by_doc_type(DocType::Guide);
    assert_eq!(guides.len(), 1);
    assert_eq!(guides[0].title, "Checkout Guide");
}

#[tokio::test]
async fn test_failing_site_reports_seeds_as_failed() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let seeds = vec![format!("{}/docs/a", base), format!("{}/docs/b", base)];
    let config = create_test_config(&base, &seeds, "");
    let mut engine = engine(&config, MemoryStore::new());

    let result = engine
        .crawl(CrawlOptions::from_config(&config).unwrap())
        .await
        .unwrap();

    assert!(result.crawled_urls.is_empty());
    assert_eq!(result.failed_urls, seeds);
    assert_eq!(engine.rebuild_index().unwrap(), 0);
}

#[tokio::test]
async fn test_max_pages_bound() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: Vec<String> = (0..10).map(|i| format!("/docs/page{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    mount_page(&server, "/docs", doc_page("Index", "All pages.", &link_refs)).await;
    for link in &links {
        mount_page(&server, link, doc_page("Page", "A page.", &["/docs", "/docs/page0"])).await;
    }

    let config = create_test_config(&base, &[format!("{}/docs", base)], "max-pages = 4");
    let mut engine = engine(&config, MemoryStore::new());

    let result = engine
        .crawl(CrawlOptions::from_config(&config).unwrap())
        .await
        .unwrap();

    assert_eq!(result.visited(), 4);
    let unique: HashSet<_> = result.crawled_urls.iter().collect();
    assert_eq!(unique.len(), result.crawled_urls.len());
    assert_eq!(hits(&server, "/docs").await, 1);
}

#[tokio::test]
async fn test_stored_pages_are_reused() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("docs.db");

    mount_page(&server, "/docs", doc_page("Home", "Start here.", &["/docs/next"])).await;
    mount_page(&server, "/docs/next", doc_page("Next", "Keep going.", &[])).await;

    let config = create_test_config(&base, &[format!("{}/docs", base)], "");

    {
        let mut engine = engine(&config, SqliteStore::new(&db_path).unwrap());
        let first = engine
            .crawl(CrawlOptions::from_config(&config).unwrap())
            .await
            .unwrap();
        assert_eq!(first.crawled_urls.len(), 2);
    }

    let mut engine = engine(&config, SqliteStore::new(&db_path).unwrap());
    let second = engine
        .crawl(CrawlOptions::from_config(&config).unwrap())
        .await
        .unwrap();

    assert!(second.crawled_urls.is_empty());
    assert_eq!(
        second.cached_urls,
        vec![format!("{}/docs", base), format!("{}/docs/next", base)]
    );
    assert_eq!(hits(&server, "/docs").await, 1);
    assert_eq!(hits(&server, "/docs/next").await, 1);
    assert_eq!(engine.rebuild_index().unwrap(), 2);
}

#[tokio::test]
async fn test_playground_fallback() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/docs",
        doc_page("Home", "Try the explorer.", &["/graphql-playground"]),
    )
    .await;
    mount_page(
        &server,
        "/graphql-playground",
        r#"<html><body><div id="root"></div><script src="/app.js"></script></body></html>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(&base, &[format!("{}/docs", base)], "");
    let mut engine = engine(&config, MemoryStore::new());

    let result = engine
        .crawl(CrawlOptions::from_config(&config).unwrap())
        .await
        .unwrap();
    assert!(result
        .crawled_urls
        .contains(&format!("{}/graphql-playground", base)));

    engine.rebuild_index().unwrap();

    let playgrounds = engine.find_by_doc_type(DocType::Playground);
    assert_eq!(playgrounds.len(), 1);
    assert_eq!(playgrounds[0].title, "GraphQL API Playground");
    assert!(playgrounds[0].section_titles.contains(&"Mutations".to_string()));

    let stored = engine
        .store()
        .get(&format!("{}/graphql-playground", base))
        .unwrap()
        .unwrap();
    assert_eq!(stored.content.api_endpoints[0].url, "https://api.example.com/graphql");
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nDisallow: /docs/private").await;
    mount_page(
        &server,
        "/docs",
        doc_page("Home", "Public docs.", &["/docs/public", "/docs/private"]),
    )
    .await;
    mount_page(&server, "/docs/public", doc_page("Public", "Open.", &[])).await;
    mount_page(&server, "/docs/private", doc_page("Private", "Closed.", &[])).await;

    let config = create_test_config(&base, &[format!("{}/docs", base)], "");
    let mut engine = engine(&config, MemoryStore::new());

    let result = engine
        .crawl(CrawlOptions::from_config(&config).unwrap())
        .await
        .unwrap();

    assert_eq!(
        result.crawled_urls,
        vec![format!("{}/docs", base), format!("{}/docs/public", base)]
    );
    assert!(result.failed_urls.is_empty());
    assert_eq!(hits(&server, "/docs/private").await, 0);
}

#[tokio::test]
async fn test_sitemap_seeding() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(
        &server,
        &format!("User-agent: *\nAllow: /\nSitemap: {}/docs-sitemap.xml", base),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs-sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<urlset><url><loc>{0}/docs/orphan</loc></url>\
             <url><loc>{0}/blog/post</loc></url></urlset>",
            base
        )))
        .mount(&server)
        .await;
    mount_page(&server, "/docs", doc_page("Home", "Linked from nowhere.", &[])).await;
    mount_page(&server, "/docs/orphan", doc_page("Orphan", "Only in the sitemap.", &[])).await;

    let config = create_test_config(&base, &[format!("{}/docs", base)], "");
    let mut engine = engine(&config, MemoryStore::new());

    let result = engine
        .crawl(CrawlOptions::from_config(&config).unwrap())
        .await
        .unwrap();

    assert!(result.crawled_urls.contains(&format!("{}/docs/orphan", base)));
    assert_eq!(hits(&server, "/blog/post").await, 0);
}

#[tokio::test]
async fn test_non_html_responses_fail() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/docs", doc_page("Home", "Manual below.", &["/docs/manual"])).await;
    Mock::given(method("GET"))
        .and(path("/docs/manual"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let config = create_test_config(&base, &[format!("{}/docs", base)], "");
    let mut engine = engine(&config, MemoryStore::new());

    let result = engine
        .crawl(CrawlOptions::from_config(&config).unwrap())
        .await
        .unwrap();

    assert_eq!(result.crawled_urls, vec![format!("{}/docs", base)]);
    assert_eq!(result.failed_urls, vec![format!("{}/docs/manual", base)]);
}
