//! Event sink trait and completion payload
//!
//! The crawl engine never talks to a transport directly. It pushes
//! [`CrawlEvent`]s into an [`EventSink`], and whoever owns the sink decides
//! whether they become log lines, JSON lines on stdout, or messages on a
//! channel.

use crate::output::events::CrawlEvent;
use crate::state::PageResult;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// The consumer of the event stream has gone away
    #[error("Event consumer disconnected")]
    Closed,

    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Payload of the `complete` event
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlSummary {
    /// Every collected page, in the order it was appended
    pub results: Vec<PageResult>,

    /// Origin of the seed URL (`scheme://host[:port]`)
    pub base_url: String,

    /// Wall-clock duration of the run
    pub elapsed_ms: u64,

    pub total_pages: usize,
}

impl CrawlSummary {
    pub fn new(results: Vec<PageResult>, base_url: String, elapsed_ms: u64) -> Self {
        let total_pages = results.len();
        Self {
            results,
            base_url,
            elapsed_ms,
            total_pages,
        }
    }

    /// Returns the number of pages that answered with a non-2xx status
    pub fn error_pages(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }

    /// Returns the share of 2xx pages as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let ok = self.results.len() - self.error_pages();
        (ok as f64 / self.results.len() as f64) * 100.0
    }
}

/// Consumer of crawl events
///
/// Implementations must be thread-safe; the orchestrator holds the sink
/// across await points. Returning [`OutputError::Closed`] tells the
/// orchestrator that nobody is listening any more, which stops the run the
/// same way a cancellation would.
pub trait EventSink: Send + Sync {
    /// Delivers one event
    ///
    /// # Arguments
    ///
    /// * `event` - The event to deliver, in emission order
    fn emit(&self, event: CrawlEvent) -> OutputResult<()>;
}
