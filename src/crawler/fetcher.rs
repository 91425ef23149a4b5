//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with status and Content-Type classification
//! - The "did it render" heuristic for client-side-only pages
//! - Handing such pages to an optional prerender service

use crate::config::{FetcherConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// App-shell markers left behind by client-side frameworks
const APP_SHELL_SELECTORS: &[&str] = &["#root", "#app", "#__next", "[data-reactroot]"];

const MAIN_REGION_SELECTORS: &[&str] = &["main", "article", "[role='main']"];

/// An app shell with less visible text than this is considered unrendered
const MIN_RENDERED_TEXT: usize = 200;

/// Errors from fetching a single URL
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Rendering {url} failed: {message}")]
    Render { url: String, message: String },
}

impl FetchError {
    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Network {
                url: url.to_string(),
                message: "Connection refused".to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// The fetch collaborator used by the crawler
///
/// `fetch` returns page HTML. `fetch_rendered` goes through the full
/// rendering path and `fetch_text` loads non-HTML resources such as
/// robots.txt and sitemaps; both default to `fetch`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    async fn fetch_rendered(&self, url: &str) -> Result<String, FetchError> {
        self.fetch(url).await
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.fetch(url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use docweave::config::{FetcherConfig, UserAgentConfig};
/// use docweave::crawler::build_http_client;
///
/// let agent = UserAgentConfig {
///     crawler_name: "Docweave".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&agent, &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(agent.header_value())
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`Fetcher`]
///
/// A lightweight GET is tried first. If the response looks like an
/// unrendered app shell and a render endpoint is configured, the page is
/// fetched again through `{render_endpoint}?url=<target>`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    render_endpoint: Option<Url>,
}

impl HttpFetcher {
    pub fn new(agent: &UserAgentConfig, fetcher: &FetcherConfig) -> crate::Result<Self> {
        let client = build_http_client(agent, fetcher)?;
        let render_endpoint = fetcher
            .render_endpoint
            .as_deref()
            .map(Url::parse)
            .transpose()?;
        Ok(Self::with_client(client, render_endpoint))
    }

    pub fn with_client(client: Client, render_endpoint: Option<Url>) -> Self {
        Self {
            client,
            render_endpoint,
        }
    }

    async fn get(&self, url: &str, require_html: bool) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if require_html {
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();

            if !is_html(&content_type) {
                return Err(FetchError::ContentMismatch {
                    url: url.to_string(),
                    content_type,
                });
            }
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }

    async fn render(&self, url: &str, endpoint: &Url) -> Result<String, FetchError> {
        let mut render_url = endpoint.clone();
        render_url.query_pairs_mut().append_pair("url", url);

        tracing::debug!("Rendering {} via {}", url, endpoint);
        self.get(render_url.as_str(), true)
            .await
            .map_err(|e| FetchError::Render {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let body = self.get(url, true).await?;

        match &self.render_endpoint {
            Some(endpoint) if needs_rendering(&body) => {
                tracing::debug!("{} looks unrendered, using render endpoint", url);
                self.render(url, endpoint).await
            }
            _ => Ok(body),
        }
    }

    async fn fetch_rendered(&self, url: &str) -> Result<String, FetchError> {
        match &self.render_endpoint {
            Some(endpoint) => self.render(url, endpoint).await,
            None => self.get(url, true).await,
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.get(url, false).await
    }
}

/// Missing or empty Content-Type is accepted as HTML
fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml")
}

/// Heuristic for pages that only render client-side
///
/// True when a main content region exists but holds no text, or when an
/// app-shell root marker is present and the body has almost no text.
pub fn needs_rendering(html: &str) -> bool {
    let document = Html::parse_document(html);

    let first = |css: &str| {
        Selector::parse(css)
            .ok()
            .and_then(|sel| document.select(&sel).next().map(|el| visible_text_len(el)))
    };

    for css in MAIN_REGION_SELECTORS {
        if let Some(len) = first(css) {
            return len == 0;
        }
    }

    let has_shell = APP_SHELL_SELECTORS.iter().any(|css| first(css).is_some());
    if !has_shell {
        return false;
    }

    first("body").unwrap_or(0) < MIN_RENDERED_TEXT
}

fn visible_text_len(element: scraper::ElementRef<'_>) -> usize {
    let mut len = 0;
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let inside_script = node
            .ancestors()
            .filter_map(scraper::ElementRef::wrap)
            .any(|a| matches!(a.value().name(), "script" | "style" | "noscript"));
        if !inside_script {
            len += text.split_whitespace().map(|w| w.chars().count()).sum::<usize>();
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_agent() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    fn fetcher(render_endpoint: Option<String>) -> HttpFetcher {
        let config = FetcherConfig {
            timeout_secs: 5,
            render_endpoint,
        };
        HttpFetcher::new(&create_test_agent(), &config).unwrap()
    }

    fn html(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_agent(), &FetcherConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_needs_rendering() {
        assert!(needs_rendering("<html><body><main></main></body></html>"));
        assert!(!needs_rendering("<html><body><main><p>Text</p></main></body></html>"));
        assert!(needs_rendering(
            r#"<html><body><div id="root"></div><script>var big = "lots of script text";</script></body></html>"#
        ));
        assert!(!needs_rendering(&format!(
            r#"<html><body><div id="app">{}</div></body></html>"#,
            "rendered words ".repeat(30)
        )));
        assert!(!needs_rendering("<html><body><p>Plain static page</p></body></html>"));
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html(""));
        assert!(!is_html("application/pdf"));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(html("<main><p>Hello</p></main>"))
            .mount(&server)
            .await;

        let body = fetcher(None)
            .fetch(&format!("{}/docs", server.uri()))
            .await
            .unwrap();
        assert!(body.contains("Hello"));
    }

    #[tokio::test]
    async fn test_fetch_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetcher(None)
            .fetch(&format!("{}/docs/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_content_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("%PDF", "application/pdf"),
            )
            .mount(&server)
            .await;

        let err = fetcher(None)
            .fetch(&format!("{}/docs/file", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::ContentMismatch { .. }));

        let text = fetcher(None)
            .fetch_text(&format!("{}/docs/file", server.uri()))
            .await
            .unwrap();
        assert_eq!(text, "%PDF");
    }

    #[tokio::test]
    async fn test_unrendered_page_goes_to_render_endpoint() {
        let server = MockServer::start().await;
        let target = format!("{}/explorer", server.uri());

        Mock::given(method("GET"))
            .and(path("/explorer"))
            .respond_with(html(r#"<html><body><div id="root"></div></body></html>"#))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/render"))
            .and(query_param("url", target.as_str()))
            .respond_with(html("<main><p>Rendered explorer</p></main>"))
            .mount(&server)
            .await;

        let fetcher = fetcher(Some(format!("{}/render", server.uri())));
        let body = fetcher.fetch(&target).await.unwrap();
        assert!(body.contains("Rendered explorer"));
    }

    #[tokio::test]
    async fn test_fetch_rendered_without_endpoint_is_light_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/playground"))
            .respond_with(html("<div id=\"root\"></div>"))
            .mount(&server)
            .await;

        let body = fetcher(None)
            .fetch_rendered(&format!("{}/playground", server.uri()))
            .await
            .unwrap();
        assert!(body.contains("root"));
    }
}
