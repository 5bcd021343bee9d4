//! Page fetcher with anti-bot challenge recovery
//!
//! This module turns a URL into a page body:
//! - One GET with the caller's headers
//! - Detection of the challenge marker in the body
//! - A single retry carrying the derived token as a cookie
//! - Classification of every failure into a `FetchError`

use crate::config::{Config, DEFAULT_CHALLENGE_MARKER, DEFAULT_COOKIE_NAME};
use crate::crawler::challenge::{PatternTokenDeriver, TokenDeriver};
use crate::crawler::transport::{FetchRequest, HttpTransport, ReqwestTransport};
use crate::{CrawlerError, FetchError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Header map sent with a fetch
pub type Headers = BTreeMap<String, String>;

/// Anything the crawler can pull page bodies from
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str, headers: &Headers) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    async fn fetch(&self, url: &str, headers: &Headers) -> Result<String, FetchError> {
        (**self).fetch(url, headers).await
    }
}

/// Fetches pages and answers anti-bot challenges
///
/// Holds no per-URL state: the challenge token lives only inside one
/// `fetch` call.
pub struct PageFetcher {
    transport: Box<dyn HttpTransport>,
    deriver: Box<dyn TokenDeriver>,
    marker: String,
    cookie_name: String,
}

impl PageFetcher {
    /// Creates a fetcher with the default challenge marker and cookie name
    pub fn new(
        transport: impl HttpTransport + 'static,
        deriver: impl TokenDeriver + 'static,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            deriver: Box::new(deriver),
            marker: DEFAULT_CHALLENGE_MARKER.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    /// Builds a reqwest-backed fetcher from configuration
    pub fn from_config(config: &Config) -> Result<Self, CrawlerError> {
        let transport = ReqwestTransport::from_config(&config.fetcher)?;
        let deriver = PatternTokenDeriver::from_config(&config.challenge)?;

        Ok(Self::new(transport, deriver)
            .with_marker(config.challenge.marker.clone())
            .with_cookie_name(config.challenge.cookie_name.clone()))
    }

    /// Whether a body is a challenge interstitial rather than content
    pub fn is_challenge(&self, body: &str) -> bool {
        body.contains(&self.marker)
    }

    /// Fetches `url`, retrying once through the challenge if one is served
    ///
    /// # Request Flow
    ///
    /// 1. GET with `headers`
    /// 2. No marker in the body → return it
    /// 3. Marker present → derive a token
    ///    - no token → `ChallengeUnsolved`, no retry
    ///    - token → GET again with only `cookie: <name>=<token>;` and return
    ///      that body as-is, without checking it for the marker again
    ///
    /// Transport errors, non-2xx statuses and empty bodies on either GET are
    /// returned as errors.
    pub async fn fetch(&self, url: &str, headers: &Headers) -> Result<String, FetchError> {
        let request = FetchRequest::new(url).with_headers(headers.clone());
        let body = self.attempt(&request).await?;

        if !self.is_challenge(&body) {
            return Ok(body);
        }

        let Some(token) = self.deriver.derive(&body) else {
            tracing::warn!("Challenge served for {} but no token could be derived", url);
            return Err(FetchError::ChallengeUnsolved {
                url: url.to_string(),
            });
        };

        tracing::debug!("Challenge served for {}, retrying with token", url);
        let retry = FetchRequest::new(url).with_header("cookie", token.into_cookie(&self.cookie_name));
        self.attempt(&retry).await
    }

    /// Performs one GET and checks status and body
    async fn attempt(&self, request: &FetchRequest) -> Result<String, FetchError> {
        let response = self
            .transport
            .get(request)
            .await
            .map_err(|e| FetchError::Transport {
                url: request.url.clone(),
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(FetchError::Status {
                url: request.url.clone(),
                status: response.status,
            });
        }

        if response.body.is_empty() {
            return Err(FetchError::EmptyBody {
                url: request.url.clone(),
            });
        }

        Ok(response.body)
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str, headers: &Headers) -> Result<String, FetchError> {
        PageFetcher::fetch(self, url, headers).await
    }
}
