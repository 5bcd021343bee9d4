//! Crawl orchestration
//!
//! This module drives the two crawl modes:
//! - Bulk listing crawl over a templated page range
//! - Targeted item crawl over an explicit id list
//!
//! Every page is handled on its own: a failed fetch or an empty extraction
//! drops that page from the batch and the crawl moves on. Pages may be
//! fetched concurrently, but results always come back in input order.

use crate::config::Config;
use crate::crawler::fetcher::{Headers, PageFetcher, PageSource};
use crate::crawler::parser::{
    ContentExtractor, LinkExtractor, SelectorContentExtractor, SelectorLinkExtractor,
};
use crate::crawler::scheduler::RequestPacer;
use crate::template::format_positional;
use crate::{CrawlerError, FetchError};
use futures::stream::{self, StreamExt};
use std::time::Duration;
use url::Url;

/// One extracted item page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDocument {
    /// The id the page was requested with
    pub id: String,

    /// The URL the id formatted to
    pub url: String,

    /// Extracted text, never empty
    pub content: String,
}

/// Why a page or id is missing from a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The page could not be fetched
    Fetch(FetchError),

    /// The page was fetched but nothing could be extracted
    EmptyContent,
}

/// A page or id left out of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Page number or item id
    pub key: String,

    pub reason: SkipReason,
}

/// Result of processing a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome<T> {
    Kept(T),
    Skipped(Skipped),
}

/// Ordered output of one crawl call
///
/// `items` holds successes in input order with skipped entries simply absent.
/// `skipped` records what was dropped, also in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlBatch<T> {
    pub items: Vec<T>,
    pub skipped: Vec<Skipped>,
}

impl<T> CrawlBatch<T> {
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = PageOutcome<T>>) -> Self {
        let mut items = Vec::new();
        let mut skipped = Vec::new();

        for outcome in outcomes {
            match outcome {
                PageOutcome::Kept(item) => items.push(item),
                PageOutcome::Skipped(skip) => skipped.push(skip),
            }
        }

        Self { items, skipped }
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages or ids that were processed, kept or not
    pub fn attempted(&self) -> usize {
        self.items.len() + self.skipped.len()
    }

    pub fn fetch_failures(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Fetch(_)))
            .count()
    }

    pub fn empty_extractions(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| s.reason == SkipReason::EmptyContent)
            .count()
    }
}

/// Crawl orchestrator
pub struct Crawler {
    source: Box<dyn PageSource>,
    links: Box<dyn LinkExtractor>,
    content: Box<dyn ContentExtractor>,
    headers: Headers,
    concurrency: usize,
    pacer: RequestPacer,
}

impl Crawler {
    /// Creates a sequential, unpaced crawler
    pub fn new(
        source: impl PageSource + 'static,
        links: impl LinkExtractor + 'static,
        content: impl ContentExtractor + 'static,
    ) -> Self {
        Self {
            source: Box::new(source),
            links: Box::new(links),
            content: Box::new(content),
            headers: Headers::new(),
            concurrency: 1,
            pacer: RequestPacer::unpaced(),
        }
    }

    /// Headers sent with the first attempt of every fetch
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Maximum number of pages in flight; values below 1 mean 1
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_pacer(mut self, pacer: RequestPacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Builds the full HTTP crawler described by a configuration
    pub fn from_config(config: &Config) -> Result<Self, CrawlerError> {
        let fetcher = PageFetcher::from_config(config)?;

        let (link_selector, base_url) = match &config.listing {
            Some(listing) => (
                listing.link_selector.as_str(),
                listing.base_url.as_deref().map(Url::parse).transpose()?,
            ),
            None => ("a[href]", None),
        };
        let links = SelectorLinkExtractor::new(link_selector, base_url)?;
        let content = SelectorContentExtractor::new(&config.items.content_selector)?;

        Ok(Self::new(fetcher, links, content)
            .with_headers(config.fetcher.headers.clone())
            .with_concurrency(config.crawler.concurrency)
            .with_pacer(RequestPacer::new(Duration::from_millis(
                config.crawler.request_delay_ms,
            ))))
    }

    /// Fetches listing pages `start_page..=last_page` in ascending order
    ///
    /// Each URL is `url_template` formatted with
    /// `(page, page, items_per_page)`. Failed pages are logged and left out;
    /// a reversed range yields an empty batch.
    pub async fn crawl_listing_pages(
        &self,
        url_template: &str,
        start_page: u32,
        last_page: u32,
        items_per_page: u32,
    ) -> CrawlBatch<String> {
        tracing::info!(
            "Crawling listing pages {}..={} ({} items per page)",
            start_page,
            last_page,
            items_per_page
        );

        let outcomes: Vec<PageOutcome<String>> = stream::iter(start_page..=last_page)
            .map(|page| self.fetch_listing_page(url_template, page, items_per_page))
            .buffered(self.concurrency)
            .collect()
            .await;

        let batch = CrawlBatch::from_outcomes(outcomes);
        tracing::info!(
            "Listing crawl finished: {} of {} pages fetched",
            batch.len(),
            batch.attempted()
        );
        batch
    }

    /// Flattens the links of every page, page order then document order
    ///
    /// Duplicates across or within pages are kept.
    pub fn extract_links(&self, pages: &[String]) -> Vec<String> {
        let links: Vec<String> = pages
            .iter()
            .flat_map(|page| self.links.extract_links(page))
            .collect();

        tracing::info!("Extracted {} links from {} pages", links.len(), pages.len());
        links
    }

    /// Fetches and extracts one item page per id, in id order
    ///
    /// An id is kept only when its page was fetched and the extractor found
    /// content. Fetch failures are logged as warnings; empty extractions are
    /// dropped quietly.
    pub async fn crawl_items(&self, url_template: &str, ids: &[String]) -> CrawlBatch<ItemDocument> {
        tracing::info!("Crawling {} item pages", ids.len());

        let outcomes: Vec<PageOutcome<ItemDocument>> = stream::iter(ids)
            .map(|id| self.fetch_item(url_template, id))
            .buffered(self.concurrency)
            .collect()
            .await;

        let batch = CrawlBatch::from_outcomes(outcomes);
        tracing::info!(
            "Item crawl finished: {} of {} items extracted ({} fetch failures, {} empty)",
            batch.len(),
            batch.attempted(),
            batch.fetch_failures(),
            batch.empty_extractions()
        );
        batch
    }

    async fn fetch_listing_page(
        &self,
        url_template: &str,
        page: u32,
        items_per_page: u32,
    ) -> PageOutcome<String> {
        let url = format_positional(url_template, &[&page, &page, &items_per_page]);
        tracing::debug!("Fetching listing page {}: {}", page, url);

        self.pacer.wait().await;
        match self.source.fetch(&url, &self.headers).await {
            Ok(body) => PageOutcome::Kept(body),
            Err(e) => {
                tracing::warn!("Skipping page {} due to error: {}", page, e);
                PageOutcome::Skipped(Skipped {
                    key: page.to_string(),
                    reason: SkipReason::Fetch(e),
                })
            }
        }
    }

    async fn fetch_item(&self, url_template: &str, id: &str) -> PageOutcome<ItemDocument> {
        let url = format_positional(url_template, &[&id]);
        tracing::debug!("Fetching item {}: {}", id, url);

        self.pacer.wait().await;
        let body = match self.source.fetch(&url, &self.headers).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Skipping item {} due to error: {}", id, e);
                return PageOutcome::Skipped(Skipped {
                    key: id.to_string(),
                    reason: SkipReason::Fetch(e),
                });
            }
        };

        match self.content.extract_text(&body) {
            Some(content) if !content.is_empty() => PageOutcome::Kept(ItemDocument {
                id: id.to_string(),
                url,
                content,
            }),
            _ => {
                tracing::debug!("Nothing extracted from item {}", id);
                PageOutcome::Skipped(Skipped {
                    key: id.to_string(),
                    reason: SkipReason::EmptyContent,
                })
            }
        }
    }
}
