use serde::Deserialize;

/// Default include patterns: documentation pages and interactive explorers
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] =
    &[r"/docs(/|$)", r"/(graphql-)?playground", r"/explorer"];

/// Default exclude patterns: binary and media files
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    r"(?i)\.(pdf|zip|gz|tar|png|jpe?g|gif|svg|ico|webp|css|js|woff2?|ttf|eot|mp4|webm|mp3)$",
];

/// Default route family that renders client-side only
pub const DEFAULT_INTERACTIVE_PATTERNS: &[&str] = &[r"/(graphql-)?playground", r"/explorer"];

/// Main configuration structure for Docweave
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

/// The documentation site being indexed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Origin of the documentation site (e.g., "https://docs.example.com")
    pub base_url: String,

    /// Host serving the API (used for endpoint extraction)
    pub api_host: String,

    /// Leading path segment skipped when deriving a page category
    #[serde(default = "default_docs_prefix")]
    pub docs_prefix: String,

    /// Known-good entry URLs
    #[serde(default)]
    pub seeds: Vec<String>,

    /// Whether to look for a sitemap when seeding
    #[serde(default = "default_true")]
    pub sitemap: bool,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum link depth from the seed URLs
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of pages visited in one crawl
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Delay applied after each fresh fetch (milliseconds)
    #[serde(default = "default_request_delay")]
    pub request_delay: u64,

    /// A URL must match at least one of these regexes
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// A URL matching any of these regexes is never crawled
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Routes that are always fetched through the rendering path
    #[serde(default = "default_interactive_patterns")]
    pub interactive_patterns: Vec<String>,

    /// Honor robots.txt disallow rules
    #[serde(default = "default_true")]
    pub respect_robots: bool,

    /// Below this many characters of main text an interactive page gets the
    /// curated fallback content
    #[serde(default = "default_min_interactive_content")]
    pub min_interactive_content: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            request_delay: default_request_delay(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
            interactive_patterns: default_interactive_patterns(),
            respect_robots: true,
            min_interactive_content: default_min_interactive_content(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Prerender service used for client-side-only pages
    #[serde(default)]
    pub render_endpoint: Option<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            render_endpoint: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite document store
    pub database_path: String,

    /// Where to write the markdown crawl report, if anywhere
    #[serde(default)]
    pub summary_path: Option<String>,
}

fn default_docs_prefix() -> String {
    "docs".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_depth() -> u32 {
    3
}

fn default_max_pages() -> usize {
    100
}

fn default_request_delay() -> u64 {
    500
}

fn default_min_interactive_content() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_include_patterns() -> Vec<String> {
    DEFAULT_INCLUDE_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_exclude_patterns() -> Vec<String> {
    DEFAULT_EXCLUDE_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_interactive_patterns() -> Vec<String> {
    DEFAULT_INTERACTIVE_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}
