use crate::output::ExportFormat;
use serde::Deserialize;

/// Number of pages fetched concurrently per batch
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Per-request fetch timeout in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Main configuration structure for Sumi-Sitemap
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages fetched concurrently (the batch size)
    pub concurrency: usize,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// Default page-count cap for runs (unbounded when absent)
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,

    /// Default depth cap for runs (unbounded when absent)
    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            max_pages: None,
            max_depth: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SitemapGenerator".to_string(),
            crawler_version: "1.0".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version (compatible; Bot)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (compatible; Bot)",
            self.crawler_name, self.crawler_version
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Export format written after a completed crawl
    pub format: ExportFormat,

    /// Destination file; stdout when absent
    pub path: Option<String>,
}

/// Parameters of a single crawl run
///
/// Fixed for the duration of one run. Each run owns its own frontier and
/// result collection, so the same `Coordinator` can execute several runs
/// without sharing any mutable state between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRunConfig {
    /// Seed URL; a missing scheme is filled in with `https://`
    pub seed_url: String,

    /// Stop once this many results have been collected
    pub max_pages: Option<usize>,

    /// Do not follow links found on pages at this depth
    pub max_depth: Option<u32>,
}

impl CrawlRunConfig {
    /// Creates an unbounded run for the given seed
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_pages: None,
            max_depth: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Config {
    /// Builds a run config for `seed_url` using the configured default limits
    pub fn run_config(&self, seed_url: impl Into<String>) -> CrawlRunConfig {
        CrawlRunConfig::new(seed_url)
            .with_max_pages(self.crawler.max_pages)
            .with_max_depth(self.crawler.max_depth)
    }
}
