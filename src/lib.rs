//! Pagesweep: a paginated document crawler
//!
//! This crate crawls a templated, paginated listing source, pulls item links
//! out of the listing pages, then fetches every item page and extracts its
//! text. Anti-bot challenge pages are answered with a single cookie retry per
//! fetch.

pub mod config;
pub mod crawler;
pub mod output;
pub mod template;

use thiserror::Error;

/// Main error type for Pagesweep setup and I/O
///
/// Per-page failures never surface here; the crawler records them as skips.
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern in config: {0}")]
    InvalidPattern(String),
}

/// Why a single page fetch produced no usable body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("empty body from {url}")]
    EmptyBody { url: String },

    #[error("challenge at {url} could not be answered")]
    ChallengeUnsolved { url: String },
}

/// Result type alias for Pagesweep operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlBatch, Crawler, ItemDocument, PageFetcher};
pub use template::format_positional;
