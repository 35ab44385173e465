//! Page retrieval.
//!
//! The pipeline only needs "give me the markup at this URL, or fail", so that
//! capability sits behind the [`Fetcher`] trait. [`HttpFetcher`] implements it
//! over reqwest; [`MemoryFetcher`] serves canned pages for tests and offline runs.

use std::collections::HashMap;
use std::future::Future;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{Result, ScoutError};

/// HTTP client configuration for fetching source and article pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header.
    pub user_agent: String,
    /// Accept-Language header.
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 12,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
            accept_language: "es-AR,es;q=0.9,en;q=0.6".to_string(),
        }
    }
}

/// Retrieves raw markup for a URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Fetches pages over HTTP with a single reused client.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ScoutError::HttpError)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(feature = "fetch")]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed_url = Url::parse(url).map_err(|e| ScoutError::InvalidUrl(e.to_string()))?;
        let timeout = self.config.timeout;
        let timed_out = |e: reqwest::Error| {
            if e.is_timeout() { ScoutError::Timeout { timeout } } else { ScoutError::HttpError(e) }
        };

        let response = self
            .client
            .get(parsed_url)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", &self.config.accept_language)
            .send()
            .await
            .map_err(timed_out)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::HttpStatus { status: status.as_u16(), url: url.to_string() });
        }

        response.text().await.map_err(timed_out)
    }
}

/// Serves pages from memory; unknown URLs answer 404.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    pages: HashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScoutError::HttpStatus { status: 404, url: url.to_string() })
    }
}
