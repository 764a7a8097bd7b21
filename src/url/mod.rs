//! URL handling module for Sumi-Sitemap
//!
//! This module provides link normalization, seed resolution, same-domain
//! checks, and the extension pre-filter that keeps known binary resources
//! out of the frontier.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{base_origin, extract_domain, is_same_origin};
pub use filter::{is_crawlable, EXCLUDED_EXTENSIONS};
pub use normalize::{normalize, resolve_seed_url};
