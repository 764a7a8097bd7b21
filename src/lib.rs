//! Sumi-Sitemap: a same-domain sitemap crawler
//!
//! This crate crawls a website from a seed URL, follows same-domain HTML links
//! with a bounded number of concurrent fetches, and produces one record per
//! page (location, depth, HTTP status, title, sitemap metadata). Progress is
//! reported through an abstract event sink and a run can be cancelled at any
//! batch boundary.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Sitemap operations
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunState,
        to: state::RunState,
    },

    #[error("Crawl was cancelled")]
    Cancelled,

    #[error("Crawl failed: {0}")]
    RunFailed(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL is empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Sitemap operations
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlRunConfig, CrawlerConfig};
pub use crawler::{crawl, CrawlOutcome, Coordinator};
pub use output::{CrawlEvent, CrawlSummary, EventSink};
pub use state::{ChangeFrequency, PageResult, RunState};
