//! Configuration module for Pagesweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use pagesweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pagesweep.toml")).unwrap();
//! println!("Fetching with concurrency {}", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ChallengeConfig, Config, CrawlerConfig, FetcherConfig, ItemsConfig, ListingConfig,
    OutputConfig, DEFAULT_CHALLENGE_MARKER, DEFAULT_COOKIE_NAME, DEFAULT_TOKEN_PATTERN,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
