//! End-to-end crawl pipeline
//!
//! Glue between configuration and the crawler: listing crawl, link
//! extraction, item id derivation, item crawl. This is the layer that
//! decides to deduplicate ids taken from links; the crawler itself never
//! deduplicates.

use crate::config::{Config, ItemsConfig, ListingConfig};
use crate::crawler::coordinator::{CrawlBatch, Crawler, ItemDocument};
use crate::{ConfigError, CrawlerError};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Output of a listing crawl plus its flattened links
#[derive(Debug, Clone)]
pub struct ListingRun {
    pub pages: CrawlBatch<String>,
    pub links: Vec<String>,
}

/// Crawls the configured listing range and extracts its links
pub async fn run_listing(crawler: &Crawler, listing: &ListingConfig) -> ListingRun {
    let pages = crawler
        .crawl_listing_pages(
            &listing.url_template,
            listing.start_page,
            listing.last_page,
            listing.items_per_page,
        )
        .await;
    let links = crawler.extract_links(&pages.items);

    ListingRun { pages, links }
}

/// Crawls the given item ids with the configured template
pub async fn run_items(
    crawler: &Crawler,
    items: &ItemsConfig,
    ids: &[String],
) -> CrawlBatch<ItemDocument> {
    crawler.crawl_items(&items.url_template, ids).await
}

/// Pulls item ids out of links with the first capture group of `pattern`
///
/// Links without a match are dropped; repeated ids keep their first position.
pub fn ids_from_links(links: &[String], pattern: &Regex) -> Vec<String> {
    let mut seen = HashSet::new();

    links
        .iter()
        .filter_map(|link| pattern.captures(link))
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect()
}

/// Reads ids from a file, one per line
///
/// Blank lines and lines starting with `#` are ignored.
pub fn read_ids_file(path: &Path) -> Result<Vec<String>, CrawlerError> {
    let content = std::fs::read_to_string(path)?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Assembles the item ids for a run
///
/// Configured ids come first, then ids from a file, then ids derived from
/// listing links when an `id-pattern` is configured. An id seen more than
/// once keeps only its first position. Ids without an items `url-template`
/// to format them into are rejected.
pub fn collect_item_ids(
    config: &Config,
    file_ids: Vec<String>,
    links: &[String],
) -> Result<Vec<String>, CrawlerError> {
    let mut ids = config.items.ids.clone();
    ids.extend(file_ids);

    if let Some(pattern) = &config.items.id_pattern {
        let pattern = Regex::new(pattern)?;
        let derived = ids_from_links(links, &pattern);
        tracing::info!("Derived {} item ids from {} links", derived.len(), links.len());
        ids.extend(derived);
    }

    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));

    if !ids.is_empty() && config.items.url_template.trim().is_empty() {
        return Err(CrawlerError::Config(ConfigError::Validation(
            "items url-template is required to crawl item ids".to_string(),
        )));
    }

    Ok(ids)
}
