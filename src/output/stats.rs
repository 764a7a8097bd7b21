//! Statistics over a finished crawl
//!
//! This module derives per-depth and per-status breakdowns from a
//! [`CrawlSummary`] and prints them for the command-line user.

use crate::output::traits::CrawlSummary;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Total number of pages collected
    pub total_pages: usize,

    /// Count of pages at each depth
    pub pages_by_depth: BTreeMap<u32, usize>,

    /// Count of pages by HTTP status
    pub pages_by_status: BTreeMap<u16, usize>,

    /// Pages without a usable `<title>`
    pub untitled_pages: usize,

    pub elapsed_ms: u64,
}

impl CrawlStatistics {
    /// Builds statistics from a completed run
    pub fn from_summary(summary: &CrawlSummary) -> Self {
        let mut stats = Self {
            total_pages: summary.results.len(),
            elapsed_ms: summary.elapsed_ms,
            ..Self::default()
        };

        for page in &summary.results {
            *stats.pages_by_depth.entry(page.depth).or_insert(0) += 1;
            if let Some(status) = page.http_status {
                *stats.pages_by_status.entry(status).or_insert(0) += 1;
            }
            if page.title.is_none() {
                stats.untitled_pages += 1;
            }
        }

        stats
    }

    /// Deepest level reached, if any page was collected
    pub fn max_depth(&self) -> Option<u32> {
        self.pages_by_depth.keys().next_back().copied()
    }

    /// Pages per second over the whole run
    pub fn pages_per_second(&self) -> f64 {
        if self.elapsed_ms == 0 {
            return 0.0;
        }
        self.total_pages as f64 / (self.elapsed_ms as f64 / 1000.0)
    }
}

/// Prints statistics in a formatted manner
///
/// Output goes to stderr; stdout is reserved for the exported sitemap.
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Total pages: {}", stats.total_pages);
    eprintln!("  Untitled pages: {}", stats.untitled_pages);
    if let Some(depth) = stats.max_depth() {
        eprintln!("  Deepest level: {}", depth);
    }
    eprintln!(
        "  Elapsed: {}ms ({:.2} pages/sec)",
        stats.elapsed_ms,
        stats.pages_per_second()
    );
    eprintln!();

    eprintln!("Pages by Depth:");
    for (depth, count) in &stats.pages_by_depth {
        eprintln!("  {}: {}", depth, count);
    }
    eprintln!();

    if !stats.pages_by_status.is_empty() {
        eprintln!("Pages by Status:");
        // Sort statuses by count (descending)
        let mut status_counts: Vec<_> = stats.pages_by_status.iter().collect();
        status_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

        for (status, count) in status_counts {
            let percentage = if stats.total_pages > 0 {
                (*count as f64 / stats.total_pages as f64) * 100.0
            } else {
                0.0
            };
            eprintln!("  {}: {} ({:.1}%)", status, count, percentage);
        }
    }
}
