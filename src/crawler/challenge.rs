//! Anti-bot challenge tokens
//!
//! A challenge page carries enough information to compute a short token. The
//! token is submitted once, as a cookie on the retry of the same URL, and is
//! consumed in the process.

use crate::config::ChallengeConfig;
use crate::CrawlerError;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Credential derived from one challenge page
#[derive(Debug, PartialEq, Eq)]
pub struct ChallengeToken(String);

impl ChallengeToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token into a cookie header value: `name=token;`
    pub fn into_cookie(self, cookie_name: &str) -> String {
        format!("{}={};", cookie_name, self.0)
    }
}

/// Derives a challenge token from a challenge page body
///
/// Returning `None` means no token can be produced; the fetch is abandoned.
pub trait TokenDeriver: Send + Sync {
    fn derive(&self, body: &str) -> Option<ChallengeToken>;
}

impl<F> TokenDeriver for F
where
    F: Fn(&str) -> Option<ChallengeToken> + Send + Sync,
{
    fn derive(&self, body: &str) -> Option<ChallengeToken> {
        self(body)
    }
}

/// Post-processing applied to the captured token text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDigest {
    /// Submit the capture unchanged
    None,
    /// Submit the lowercase hex SHA-256 of the capture
    Sha256,
}

impl FromStr for TokenDigest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(TokenDigest::None),
            "sha256" => Ok(TokenDigest::Sha256),
            other => Err(format!("unknown digest '{}'", other)),
        }
    }
}

impl fmt::Display for TokenDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenDigest::None => write!(f, "none"),
            TokenDigest::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Token deriver driven by a regex with one capture group
#[derive(Debug, Clone)]
pub struct PatternTokenDeriver {
    pattern: Regex,
    digest: TokenDigest,
}

impl PatternTokenDeriver {
    pub fn new(pattern: &str, digest: TokenDigest) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            digest,
        })
    }

    pub fn from_config(config: &ChallengeConfig) -> Result<Self, CrawlerError> {
        let digest = config.digest.parse::<TokenDigest>().map_err(|e| {
            CrawlerError::Config(crate::ConfigError::Validation(e))
        })?;
        Ok(Self::new(&config.token_pattern, digest)?)
    }
}

impl TokenDeriver for PatternTokenDeriver {
    fn derive(&self, body: &str) -> Option<ChallengeToken> {
        let captured = self
            .pattern
            .captures(body)?
            .get(1)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())?;

        let token = match self.digest {
            TokenDigest::None => captured.to_string(),
            TokenDigest::Sha256 => hex::encode(Sha256::digest(captured.as_bytes())),
        };

        Some(ChallengeToken(token))
    }
}
