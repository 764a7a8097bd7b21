//! Configuration module for Sumi-Sitemap
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; an absent file behaves like `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use sumi_sitemap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitemap.toml")).unwrap();
//! println!("Crawler will fetch {} pages at a time", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlRunConfig, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_CONCURRENCY,
    DEFAULT_FETCH_TIMEOUT_MS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, validate_run_config};
