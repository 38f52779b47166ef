//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with user agent, timeout and no redirects
//! - Attaching the session cookies to every request
//! - Collapsing every non-200 outcome into a single "unavailable" result

use crate::config::{CrawlerConfig, SessionCookies};
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
///
/// The crawler never distinguishes a 404 from a timeout; both are
/// `Unavailable` and the reason is only used for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// HTTP 200 with its body
    Success { body: String },

    /// Any other status, a redirect, or a transport error
    Unavailable { reason: String },
}

impl FetchResult {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Anything that can GET a page for the crawler
#[async_trait]
pub trait PageFetcher {
    /// Fetches `url` with the given query parameters
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are not followed: the portal answers expired sessions with a
/// redirect to its landing page, which must count as unavailable.
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Live fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    cookie_header: Option<String>,
}

impl HttpFetcher {
    pub fn new(client: Client, cookies: &SessionCookies) -> Self {
        Self {
            client,
            cookie_header: cookies.header_value(),
        }
    }

    /// Builds the client from config and attaches `cookies`
    pub fn from_config(
        config: &CrawlerConfig,
        cookies: &SessionCookies,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?, cookies))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> FetchResult {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(cookies) = &self.cookie_header {
            request = request.header(header::COOKIE, cookies);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection refused".to_string()
                } else {
                    e.to_string()
                };
                tracing::debug!("GET {} failed: {}", url, reason);
                return FetchResult::unavailable(reason);
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("GET {} returned HTTP {}", url, status.as_u16());
            return FetchResult::unavailable(format!("HTTP {}", status.as_u16()));
        }

        match response.text().await {
            Ok(body) => FetchResult::Success { body },
            Err(e) => FetchResult::unavailable(format!("Failed to read body: {}", e)),
        }
    }
}
