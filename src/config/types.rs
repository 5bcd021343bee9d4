use serde::Deserialize;
use std::collections::BTreeMap;

/// Marker text that identifies an anti-bot interstitial instead of real content
pub const DEFAULT_CHALLENGE_MARKER: &str = "error-section__title";

/// Cookie key the challenge token is submitted under
pub const DEFAULT_COOKIE_NAME: &str = "__arcsjs";

/// Pattern whose first capture group is the challenge token
pub const DEFAULT_TOKEN_PATTERN: &str = r#"__arcsjs["']?\s*[:=,]\s*["']([^"';\s]+)["']"#;

/// Main configuration structure for Pagesweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub challenge: ChallengeConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub listing: Option<ListingConfig>,
    #[serde(default)]
    pub items: ItemsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Extra headers sent with the first attempt of every fetch
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Anti-bot challenge handling
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeConfig {
    /// Substring that marks a challenge page
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Cookie key used for the retry
    #[serde(rename = "cookie-name", default = "default_cookie_name")]
    pub cookie_name: String,

    /// Regex whose first capture group yields the token
    #[serde(rename = "token-pattern", default = "default_token_pattern")]
    pub token_pattern: String,

    /// "none" to submit the capture as-is, "sha256" to submit its hex digest
    #[serde(default = "default_digest")]
    pub digest: String,
}

/// Crawl loop behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of pages fetched at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Minimum time between request starts (milliseconds)
    #[serde(rename = "request-delay-ms", default)]
    pub request_delay_ms: u64,
}

/// Paginated listing crawl
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    /// Template taking (page, page, items-per-page)
    #[serde(rename = "url-template")]
    pub url_template: String,

    #[serde(rename = "start-page")]
    pub start_page: u32,

    #[serde(rename = "last-page")]
    pub last_page: u32,

    #[serde(rename = "items-per-page")]
    pub items_per_page: u32,

    /// CSS selector for item links on a listing page
    #[serde(rename = "link-selector", default = "default_link_selector")]
    pub link_selector: String,

    /// Base URL used to resolve relative links
    #[serde(rename = "base-url", default)]
    pub base_url: Option<String>,
}

/// Item page crawl
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsConfig {
    /// Template taking a single item id
    #[serde(rename = "url-template", default)]
    pub url_template: String,

    /// Explicit ids to crawl
    #[serde(default)]
    pub ids: Vec<String>,

    /// Regex whose first capture group extracts an id from a listing link
    #[serde(rename = "id-pattern", default)]
    pub id_pattern: Option<String>,

    /// CSS selector for the content of an item page
    #[serde(rename = "content-selector", default = "default_content_selector")]
    pub content_selector: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the extracted link list
    #[serde(rename = "links-path", default = "default_links_path")]
    pub links_path: String,

    /// Path of the markdown documents file
    #[serde(rename = "documents-path", default = "default_documents_path")]
    pub documents_path: String,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            cookie_name: default_cookie_name(),
            token_pattern: default_token_pattern(),
            digest: default_digest(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            request_delay_ms: 0,
        }
    }
}

impl Default for ItemsConfig {
    fn default() -> Self {
        Self {
            url_template: String::new(),
            ids: Vec::new(),
            id_pattern: None,
            content_selector: default_content_selector(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            links_path: default_links_path(),
            documents_path: default_documents_path(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_marker() -> String {
    DEFAULT_CHALLENGE_MARKER.to_string()
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_digest() -> String {
    "none".to_string()
}

fn default_concurrency() -> usize {
    1
}

fn default_link_selector() -> String {
    "a[href]".to_string()
}

fn default_content_selector() -> String {
    "body".to_string()
}

fn default_links_path() -> String {
    "links.txt".to_string()
}

fn default_documents_path() -> String {
    "documents.md".to_string()
}
