//! HTTP transport
//!
//! A thin seam over the HTTP client so the fetcher's challenge logic can be
//! driven by scripted responses in tests. The real transport wraps a
//! `reqwest::Client`.

use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// One GET attempt: a URL plus the headers to send with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Status and body of a completed GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure below the HTTP status level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    #[error("{0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Something that can perform a GET
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: &FetchRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn get(&self, request: &FetchRequest) -> Result<HttpResponse, TransportError> {
        (**self).get(request).await
    }
}

/// Builds an HTTP client from the fetcher configuration
///
/// # Example
///
/// ```no_run
/// use pagesweep::config::FetcherConfig;
/// use pagesweep::crawler::build_http_client;
///
/// let config = FetcherConfig {
///     user_agent: "pagesweep/0.1".to_string(),
///     timeout_secs: 30,
///     connect_timeout_secs: 10,
///     headers: Default::default(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &FetchRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.get(&request.url);

        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
            builder = builder.header(header_name, header_value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> FetcherConfig {
        FetcherConfig {
            user_agent: "TestCrawler/1.0".to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
            headers: BTreeMap::new(),
        }
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&create_test_config()).is_ok());
    }

    #[test]
    fn test_fetch_request_headers() {
        let request = FetchRequest::new("https://example.com/")
            .with_header("accept-language", "fa-IR")
            .with_header("cookie", "a=b;");

        assert_eq!(request.url, "https://example.com/");
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.headers["cookie"], "a=b;");
    }

    #[test]
    fn test_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: String::new(),
        };
        let redirect = HttpResponse {
            status: 302,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }

    #[tokio::test]
    async fn test_invalid_header_is_reported() {
        let transport = ReqwestTransport::from_config(&create_test_config()).unwrap();
        let request =
            FetchRequest::new("http://127.0.0.1:9/").with_header("bad header", "value");

        let result = transport.get(&request).await;
        assert_eq!(
            result,
            Err(TransportError::InvalidHeader("bad header".to_string()))
        );
    }
}
