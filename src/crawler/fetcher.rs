//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the identifying user agent string
//! - GET requests bounded by the configured timeout
//! - Content-type gating (only HTML bodies are returned)
//! - Aborting in-flight requests when the run is cancelled

use crate::config::Config;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Response of a successful round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTML body; empty for non-2xx responses
    pub body: String,

    /// Final HTTP status after redirects
    pub status: u16,
}

impl FetchedPage {
    /// Returns true if there is markup worth parsing
    pub fn has_html(&self) -> bool {
        !self.body.is_empty()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (user agent and fetch timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::config::Config;
/// use sumi_sitemap::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .default_headers(headers)
        .timeout(Duration::from_millis(config.crawler.fetch_timeout_ms))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page, returning its HTML body and status
///
/// # Outcomes
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML content type | `Some { body, status }` |
/// | Non-2xx status | `Some { body: "", status }` |
/// | 2xx with non-HTML content type | `None` |
/// | Timeout, connection or body read failure | `None` |
/// | Cancelled before or during the request | `None` |
///
/// A `None` is final for the URL within a run; nothing is retried.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `cancel` - Run cancellation token, raced against the request
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    cancel: &CancellationToken,
) -> Option<FetchedPage> {
    if cancel.is_cancelled() {
        return None;
    }

    tokio::select! {
        _ = cancel.cancelled() => {
            tracing::debug!("Fetch of {} abandoned: crawl cancelled", url);
            None
        }
        page = send_request(client, url) => page,
    }
}

async fn send_request(client: &Client, url: &Url) -> Option<FetchedPage> {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            if e.is_timeout() {
                tracing::debug!("Request timeout for {}", url);
            } else if e.is_connect() {
                tracing::debug!("Connection failed for {}: {}", url, e);
            } else {
                tracing::debug!("Request failed for {}: {}", url, e);
            }
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("{} returned HTTP {}", url, status.as_u16());
        return Some(FetchedPage {
            body: String::new(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        tracing::debug!("Skipping {}: content type '{}'", url, content_type);
        return None;
    }

    match response.text().await {
        Ok(body) => Some(FetchedPage {
            body,
            status: status.as_u16(),
        }),
        Err(e) => {
            tracing::debug!("Failed to read body of {}: {}", url, e);
            None
        }
    }
}

/// Checks a `Content-Type` header value for an HTML media type
pub fn is_html_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    media_type == "text/html" || media_type == "application/xhtml+xml"
}
