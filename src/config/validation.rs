use crate::config::types::{
    ChallengeConfig, Config, CrawlerConfig, FetcherConfig, ItemsConfig, ListingConfig,
    OutputConfig,
};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Upper bound on simultaneous page fetches
const MAX_CONCURRENCY: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_challenge_config(&config.challenge)?;
    validate_crawler_config(&config.crawler)?;
    if let Some(listing) = &config.listing {
        validate_listing_config(listing)?;
    }
    validate_items_config(&config.items)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    for name in config.headers.keys() {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ConfigError::Validation(format!(
                "Invalid header name '{}'",
                name
            )));
        }
    }

    Ok(())
}

/// Validates challenge handling configuration
fn validate_challenge_config(config: &ChallengeConfig) -> Result<(), ConfigError> {
    if config.marker.is_empty() {
        return Err(ConfigError::Validation(
            "challenge marker cannot be empty".to_string(),
        ));
    }

    if config.cookie_name.is_empty()
        || config
            .cookie_name
            .chars()
            .any(|c| c == '=' || c == ';' || c.is_whitespace())
    {
        return Err(ConfigError::Validation(format!(
            "Invalid cookie-name '{}'",
            config.cookie_name
        )));
    }

    let pattern = compile_pattern("token-pattern", &config.token_pattern)?;
    if pattern.captures_len() < 2 {
        return Err(ConfigError::InvalidPattern(format!(
            "token-pattern '{}' must contain a capture group",
            config.token_pattern
        )));
    }

    if !matches!(config.digest.as_str(), "none" | "sha256") {
        return Err(ConfigError::Validation(format!(
            "digest must be \"none\" or \"sha256\", got '{}'",
            config.digest
        )));
    }

    Ok(())
}

/// Validates crawl loop configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    Ok(())
}

/// Validates listing crawl configuration
///
/// `start-page > last-page` is accepted; such a crawl simply yields nothing.
fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    if config.url_template.trim().is_empty() {
        return Err(ConfigError::Validation(
            "listing url-template cannot be empty".to_string(),
        ));
    }

    if config.items_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "items-per-page must be >= 1, got {}",
            config.items_per_page
        )));
    }

    validate_selector("link-selector", &config.link_selector)?;

    if let Some(base) = &config.base_url {
        Url::parse(base)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base, e)))?;
    }

    Ok(())
}

/// Validates item crawl configuration
fn validate_items_config(config: &ItemsConfig) -> Result<(), ConfigError> {
    let needs_template = !config.ids.is_empty() || config.id_pattern.is_some();
    if needs_template && config.url_template.trim().is_empty() {
        return Err(ConfigError::Validation(
            "items url-template is required when ids or id-pattern are set".to_string(),
        ));
    }

    if let Some(pattern) = &config.id_pattern {
        let regex = compile_pattern("id-pattern", pattern)?;
        if regex.captures_len() < 2 {
            return Err(ConfigError::InvalidPattern(format!(
                "id-pattern '{}' must contain a capture group",
                pattern
            )));
        }
    }

    validate_selector("content-selector", &config.content_selector)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.links_path.is_empty() {
        return Err(ConfigError::Validation(
            "links-path cannot be empty".to_string(),
        ));
    }

    if config.documents_path.is_empty() {
        return Err(ConfigError::Validation(
            "documents-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_selector(field: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern(format!("{} '{}': {}", field, selector, e)))
}

fn compile_pattern(field: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern)
        .map_err(|e| ConfigError::InvalidPattern(format!("{} '{}': {}", field, pattern, e)))
}
