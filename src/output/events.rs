//! Crawl events and the bundled sinks

use crate::output::traits::{CrawlSummary, EventSink, OutputError, OutputResult};
use crate::state::PageResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Emitted once when a run leaves `Idle`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartEvent {
    pub base_url: String,
    pub start_time: DateTime<Utc>,
}

/// Emitted for every result appended to the collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlEvent {
    #[serde(rename = "url")]
    pub page: PageResult,

    /// Results collected so far, including this one
    pub total: usize,

    /// Frontier queue depth when the event was emitted
    pub queued: usize,
}

/// Emitted once per batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub crawled: usize,
    pub queued: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEvent {
    pub message: String,
}

/// A notification emitted during a crawl run
///
/// Order within a run: one `Start`, then per batch any number of `Url`
/// followed by one `Progress`, then exactly one of `Complete` or `Error`.
/// A cancelled run ends without a terminal event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum CrawlEvent {
    Start(StartEvent),
    Url(UrlEvent),
    Progress(ProgressEvent),
    Complete(CrawlSummary),
    Error(ErrorEvent),
}

impl CrawlEvent {
    /// Returns the wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::Url(_) => "url",
            Self::Progress(_) => "progress",
            Self::Complete(_) => "complete",
            Self::Error(_) => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Error(_))
    }
}

/// Forwards events over an unbounded tokio channel
///
/// Dropping the receiver makes every later `emit` fail with
/// [`OutputError::Closed`].
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<CrawlEvent>,
}

impl ChannelSink {
    /// Creates a sink together with the receiving half of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CrawlEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: CrawlEvent) -> OutputResult<()> {
        self.sender.send(event).map_err(|_| OutputError::Closed)
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<CrawlEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything emitted so far
    pub fn events(&self) -> Vec<CrawlEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: CrawlEvent) -> OutputResult<()> {
        self.events
            .lock()
            .map_err(|e| OutputError::Write(e.to_string()))?
            .push(event);
        Ok(())
    }
}

/// Turns events into log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: CrawlEvent) -> OutputResult<()> {
        match &event {
            CrawlEvent::Start(start) => {
                tracing::info!("Crawl of {} started at {}", start.base_url, start.start_time)
            }
            CrawlEvent::Url(url) => tracing::debug!(
                "[{}] {} (depth {}, status {:?})",
                url.total,
                url.page.location,
                url.page.depth,
                url.page.http_status
            ),
            CrawlEvent::Progress(progress) => tracing::info!(
                "Progress: {} pages crawled, {} queued, {}ms elapsed",
                progress.crawled,
                progress.queued,
                progress.elapsed_ms
            ),
            CrawlEvent::Complete(summary) => tracing::info!(
                "Crawl of {} complete: {} pages in {}ms",
                summary.base_url,
                summary.total_pages,
                summary.elapsed_ms
            ),
            CrawlEvent::Error(error) => tracing::error!("Crawl failed: {}", error.message),
        }
        Ok(())
    }
}
