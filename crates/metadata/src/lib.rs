//! Content metadata client for the teaser dialog.
//!
//! This crate provides the asynchronous lookup of fallback title/description
//! text for a referenced content resource. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Validating `TEASER_CONTENT_BASE` for safety
//! - Fetching `<path>/_jcr_content.json` and mapping any failure or
//!   unexpected shape to "no data"
//! - The resolution rules in [`MetadataResolver`]: current-page fallback,
//!   the leading-`/` gate, and failure swallowing
//!
//! The primary entry points are [`MetadataClient`] for transport and
//! [`MetadataResolver`] for the resolution rules. The [`MetadataFetch`] trait
//! is the seam that lets the synchronization core be tested without a live
//! content repository.

mod resolver;

use std::{env, time::Duration};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, header};
use teaser_types::MetadataResult;
use tracing::debug;
use url::Url;

pub use resolver::MetadataResolver;

/// Environment variable overriding the content repository base URL.
pub const CONTENT_BASE_ENV: &str = "TEASER_CONTENT_BASE";
/// Default authoring-instance base URL.
pub const DEFAULT_CONTENT_BASE: &str = "http://localhost:4502";
/// Suffix appended to a resource path to address its metadata document.
pub const METADATA_SUFFIX: &str = "/_jcr_content.json";

/// Errors produced while fetching resource metadata.
///
/// Callers above the resolver never see these; the resolver swallows them
/// into a no-data outcome.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("metadata document was not usable: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Abstract fetch of a resource's metadata document.
///
/// Implemented by [`MetadataClient`] for the real transport and by in-memory
/// fakes in tests. `path` is the bare resource path; implementations append
/// [`METADATA_SUFFIX`].
#[async_trait]
pub trait MetadataFetch: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<MetadataResult, MetadataError>;
}

/// Thin wrapper around a configured `reqwest::Client` for content access.
///
/// The client builds requests against a validated base URL and identifies
/// itself with a consistent User-Agent. Authentication is assumed to be
/// handled by the ambient session.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl MetadataClient {
    /// Construct a [`MetadataClient`] from the environment.
    ///
    /// The base URL is taken from `TEASER_CONTENT_BASE` (if set) or falls
    /// back to the default authoring instance. It must be an http(s) URL
    /// with a host.
    pub fn new_from_env() -> Result<Self> {
        let base_url = env::var(CONTENT_BASE_ENV).unwrap_or_else(|_| DEFAULT_CONTENT_BASE.into());
        Self::new_with_base_url(base_url)
    }

    /// Construct a [`MetadataClient`] against an explicit base URL.
    pub fn new_with_base_url(base_url: String) -> Result<Self> {
        validate_base_url(&base_url)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("teaser-dialog/0.1; {}", env::consts::OS),
        })
    }
}

#[async_trait]
impl MetadataFetch for MetadataClient {
    async fn fetch(&self, path: &str) -> Result<MetadataResult, MetadataError> {
        let url = format!("{}{}{}", self.base_url, path, METADATA_SUFFIX);
        debug!(%url, "fetching resource metadata");

        let response = self
            .http
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await?
            .error_for_status()?;

        // A document that parses but lacks the expected fields still counts
        // as data; the absent fields seed the inheritable values as unset.
        let document: serde_json::Value = response.json().await?;
        let result: MetadataResult = serde_json::from_value(document)?;
        Ok(result)
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - scheme must be `http` or `https`
/// - the URL must include a host
fn validate_base_url(base: &str) -> Result<()> {
    let parsed = Url::parse(base).map_err(|e| anyhow!("Invalid {} URL '{}': {}", CONTENT_BASE_ENV, base, e))?;

    if parsed.host_str().is_none() {
        return Err(anyhow!("{} must include a host", CONTENT_BASE_ENV));
    }
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(anyhow!(
            "{} must use http or https; got '{}://'",
            CONTENT_BASE_ENV,
            parsed.scheme()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_bases() {
        assert!(validate_base_url("http://localhost:4502").is_ok());
        assert!(validate_base_url("https://author.example.com").is_ok());
    }

    #[test]
    fn rejects_hostless_and_odd_schemes() {
        assert!(validate_base_url("file:///tmp/content").is_err());
        assert!(validate_base_url("not a url").is_err());
    }
}
