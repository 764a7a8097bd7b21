//! Crawl frontier: pending queue plus dedup bookkeeping for one run
//!
//! The frontier is owned by the run that drives it and is only touched
//! between batches, so it needs no internal locking. Fetch tasks hand their
//! discovered links back to the coordinator, which admits them here.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched, with the depth it was discovered at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: Url,
    pub depth: u32,
}

/// Visited set, queued set and the FIFO of pending targets
///
/// # Invariants
///
/// - A URL enters `queued` at most once per run.
/// - A URL in `visited` is never admitted again.
/// - `visited` only grows.
#[derive(Debug, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    queued: HashSet<String>,
    pending: VecDeque<CrawlTarget>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed at depth 0
    pub fn with_seed(seed: Url) -> Self {
        let mut frontier = Self::new();
        frontier.admit(seed, 0);
        frontier
    }

    /// Queues `url` at `depth` unless it was already visited or queued
    ///
    /// Returns false for duplicates; that is not an error.
    pub fn admit(&mut self, url: Url, depth: u32) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }

        self.queued.insert(key.to_string());
        self.pending.push_back(CrawlTarget { url, depth });
        true
    }

    /// Dequeues up to `n` targets that have not been visited yet
    ///
    /// Visited entries met along the way are discarded and do not count
    /// toward `n`. Returned targets stay in `queued` until marked visited.
    pub fn take_batch(&mut self, n: usize) -> Vec<CrawlTarget> {
        let mut batch = Vec::with_capacity(n.min(self.pending.len()));

        while batch.len() < n {
            let Some(target) = self.pending.pop_front() else {
                break;
            };

            if self.visited.contains(target.url.as_str()) {
                tracing::trace!("Skipping already visited {}", target.url);
                continue;
            }

            batch.push(target);
        }

        batch
    }

    /// Moves `url` to the visited set
    ///
    /// Returns true if this is the first time the URL was marked.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        let key = url.as_str();
        self.queued.remove(key);
        self.visited.insert(key.to_string())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Returns true when nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue depth, used for progress reporting
    pub fn size(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
