//! Crawler module for page fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with anti-bot challenge recovery
//! - Link and content extraction from HTML
//! - Request pacing
//! - Listing and item crawl orchestration

mod challenge;
mod coordinator;
mod fetcher;
mod parser;
pub mod pipeline;
mod scheduler;
mod transport;

pub use challenge::{ChallengeToken, PatternTokenDeriver, TokenDeriver, TokenDigest};
pub use coordinator::{CrawlBatch, Crawler, ItemDocument, PageOutcome, SkipReason, Skipped};
pub use fetcher::{Headers, PageFetcher, PageSource};
pub use parser::{
    compile_selector, ContentExtractor, LinkExtractor, SelectorContentExtractor,
    SelectorLinkExtractor,
};
pub use scheduler::RequestPacer;
pub use transport::{
    build_http_client, FetchRequest, HttpResponse, HttpTransport, ReqwestTransport,
    TransportError,
};
