//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with content-type gating and cancellation
//! - HTML parsing and link extraction
//! - The per-run frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{CrawlOutcome, Coordinator};
pub use fetcher::{build_http_client, fetch_page, is_html_content_type, FetchedPage};
pub use frontier::{CrawlTarget, Frontier};
pub use parser::{extract_links, extract_title, parse_html, ParsedPage};

use crate::config::{Config, CrawlRunConfig};
use crate::output::{CrawlSummary, TracingSink};
use crate::SitemapError;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the non-streaming entry point. Events are only logged, and
/// the call resolves once the run reaches a terminal state.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `run` - Seed URL and limits for this run
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed successfully
/// * `Err(SitemapError)` - Invalid input, or the run failed
pub async fn crawl(config: &Config, run: &CrawlRunConfig) -> Result<CrawlSummary, SitemapError> {
    let coordinator = Coordinator::new(config)?;

    match coordinator
        .run(run, &TracingSink, CancellationToken::new())
        .await?
    {
        CrawlOutcome::Completed(summary) => Ok(summary),
        CrawlOutcome::Cancelled { .. } => Err(SitemapError::Cancelled),
        CrawlOutcome::Failed { message, .. } => Err(SitemapError::RunFailed(message)),
    }
}
