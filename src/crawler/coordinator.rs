//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the batch loop that drives a single crawl run:
//! - Seeding the frontier and emitting the `start` event
//! - Dispatching bounded batches of concurrent fetch+parse tasks
//! - Joining each batch and feeding discovered links back into the frontier
//! - Enforcing page and depth limits
//! - Observing cancellation between batches and before every event
//! - Emitting the terminal `complete` or `error` event

use crate::config::{validate, validate_run_config, Config, CrawlRunConfig};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::parser::{parse_html, ParsedPage};
use crate::output::{
    CrawlEvent, CrawlSummary, ErrorEvent, EventSink, OutputError, ProgressEvent, StartEvent,
    UrlEvent,
};
use crate::state::{PageResult, RunState};
use crate::url::{base_origin, resolve_seed_url};
use crate::SitemapError;
use chrono::Utc;
use reqwest::Client;
use std::time::Instant;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use url::Url;

/// How a crawl run ended
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlOutcome {
    /// The frontier drained or the page limit was reached
    Completed(CrawlSummary),

    /// Cancellation was observed; carries what was collected before it
    Cancelled { results: Vec<PageResult> },

    /// An internal error stopped the run
    Failed {
        message: String,
        results: Vec<PageResult>,
    },
}

impl CrawlOutcome {
    /// Returns the terminal run state for this outcome
    pub fn state(&self) -> RunState {
        match self {
            Self::Completed(_) => RunState::Completed,
            Self::Cancelled { .. } => RunState::Cancelled,
            Self::Failed { .. } => RunState::Failed,
        }
    }

    /// Results collected by the run, partial unless it completed
    pub fn results(&self) -> &[PageResult] {
        match self {
            Self::Completed(summary) => &summary.results,
            Self::Cancelled { results } | Self::Failed { results, .. } => results,
        }
    }

    pub fn into_summary(self) -> Option<CrawlSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Main crawler coordinator structure
///
/// Holds only what is shared by every run: the HTTP client and the batch
/// size. Each call to [`Coordinator::run`] builds its own frontier and
/// result collection, so concurrent runs never share mutable state.
#[derive(Debug, Clone)]
pub struct Coordinator {
    client: Client,
    concurrency: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SitemapError)` - Invalid configuration or HTTP client failure
    pub fn new(config: &Config) -> Result<Self, SitemapError> {
        validate(config)?;

        let client = build_http_client(config)?;

        Ok(Self {
            client,
            concurrency: config.crawler.concurrency,
        })
    }

    /// Runs one crawl to its terminal state
    ///
    /// Invalid limits or an unusable seed URL are returned as `Err` before
    /// any event is emitted. Everything after that, including internal
    /// failures, is reported through the returned [`CrawlOutcome`] and the
    /// event sink.
    ///
    /// Cancelling `cancel` stops the run before the next batch or event.
    /// The run works on a child of the token, so a sink that hangs up only
    /// stops this run.
    pub async fn run(
        &self,
        run: &CrawlRunConfig,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<CrawlOutcome, SitemapError> {
        validate_run_config(run)?;
        let seed = resolve_seed_url(&run.seed_url)?;

        tracing::info!("Starting crawl of {}", seed);

        let crawl = CrawlRun::new(self, seed, run, sink, cancel.child_token());
        Ok(crawl.execute().await)
    }
}

/// Output of one fetch+parse task
#[derive(Debug)]
struct CrawledPage {
    page: PageResult,
    links: Vec<Url>,
}

/// State owned by a single run
struct CrawlRun<'a> {
    client: &'a Client,
    concurrency: usize,
    max_pages: Option<usize>,
    max_depth: Option<u32>,
    base_url: String,
    frontier: Frontier,
    results: Vec<PageResult>,
    state: RunState,
    started: Instant,
    sink: &'a dyn EventSink,
    cancel: CancellationToken,
}

impl<'a> CrawlRun<'a> {
    fn new(
        coordinator: &'a Coordinator,
        seed: Url,
        run: &CrawlRunConfig,
        sink: &'a dyn EventSink,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client: &coordinator.client,
            concurrency: coordinator.concurrency,
            max_pages: run.max_pages,
            max_depth: run.max_depth,
            base_url: base_origin(&seed),
            frontier: Frontier::with_seed(seed),
            results: Vec::new(),
            state: RunState::Idle,
            started: Instant::now(),
            sink,
            cancel,
        }
    }

    async fn execute(mut self) -> CrawlOutcome {
        match self.drive().await {
            Ok(true) if !self.cancel.is_cancelled() => self.complete(),
            Ok(_) => self.cancelled(),
            Err(e) => self.fail(e),
        }
    }

    /// Runs batches until the frontier drains, the page limit is hit or the
    /// run is cancelled
    ///
    /// Returns `Ok(false)` when the loop stopped because of cancellation.
    async fn drive(&mut self) -> Result<bool, SitemapError> {
        self.set_state(RunState::Running)?;

        let start = CrawlEvent::Start(StartEvent {
            base_url: self.base_url.clone(),
            start_time: Utc::now(),
        });
        if !self.emit(start)? {
            return Ok(false);
        }

        while !self.frontier.is_empty() && !self.page_limit_reached() {
            if self.cancel.is_cancelled() {
                return Ok(false);
            }

            let batch = self.frontier.take_batch(self.concurrency);
            if batch.is_empty() {
                break;
            }

            if !self.run_batch(batch).await? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    async fn run_batch(&mut self, batch: Vec<CrawlTarget>) -> Result<bool, SitemapError> {
        tracing::debug!(
            "Dispatching batch of {} ({} queued)",
            batch.len(),
            self.frontier.size()
        );

        let size = batch.len();
        let mut tasks = JoinSet::new();
        for (slot, target) in batch.into_iter().enumerate() {
            self.frontier.mark_visited(&target.url);

            let client = self.client.clone();
            let max_depth = self.max_depth;
            let cancel = self.cancel.clone();
            tasks.spawn(async move {
                let crawled = crawl_target(client, target, max_depth, cancel).await;
                (slot, crawled)
            });
        }

        let joined = join_batch(tasks, size).await?;

        if self.cancel.is_cancelled() {
            return Ok(false);
        }

        for crawled in joined.into_iter().flatten() {
            let next_depth = crawled.page.depth + 1;

            if !self.page_limit_reached() {
                self.results.push(crawled.page.clone());
                let event = CrawlEvent::Url(UrlEvent {
                    page: crawled.page,
                    total: self.results.len(),
                    queued: self.frontier.size(),
                });
                if !self.emit(event)? {
                    return Ok(false);
                }
            }

            for link in crawled.links {
                self.frontier.admit(link, next_depth);
            }
        }

        let progress = CrawlEvent::Progress(ProgressEvent {
            crawled: self.results.len(),
            queued: self.frontier.size(),
            elapsed_ms: self.elapsed_ms(),
        });
        self.emit(progress)
    }

    fn complete(mut self) -> CrawlOutcome {
        self.finish(RunState::Completed);

        let elapsed_ms = self.elapsed_ms();
        let summary = CrawlSummary::new(self.results, self.base_url, elapsed_ms);

        tracing::info!(
            "Crawl completed: {} pages in {}ms",
            summary.total_pages,
            summary.elapsed_ms
        );

        if let Err(e) = self.sink.emit(CrawlEvent::Complete(summary.clone())) {
            tracing::warn!("Failed to deliver complete event: {}", e);
        }

        CrawlOutcome::Completed(summary)
    }

    fn cancelled(mut self) -> CrawlOutcome {
        self.finish(RunState::Cancelled);

        tracing::info!(
            "Crawl cancelled after {} pages ({} visited)",
            self.results.len(),
            self.frontier.visited_count()
        );

        CrawlOutcome::Cancelled {
            results: self.results,
        }
    }

    fn fail(mut self, error: SitemapError) -> CrawlOutcome {
        self.finish(RunState::Failed);

        let message = error.to_string();
        tracing::error!("Crawl failed: {}", message);

        let event = CrawlEvent::Error(ErrorEvent {
            message: message.clone(),
        });
        if let Err(e) = self.sink.emit(event) {
            tracing::warn!("Failed to deliver error event: {}", e);
        }

        CrawlOutcome::Failed {
            message,
            results: self.results,
        }
    }

    /// Delivers an event unless the run is cancelled
    ///
    /// A sink that hung up cancels the run. Returns `Ok(false)` when the
    /// event was not delivered for either reason.
    fn emit(&self, event: CrawlEvent) -> Result<bool, SitemapError> {
        if self.cancel.is_cancelled() {
            return Ok(false);
        }

        match self.sink.emit(event) {
            Ok(()) => Ok(true),
            Err(OutputError::Closed) => {
                tracing::info!("Event sink closed, cancelling crawl");
                self.cancel.cancel();
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_state(&mut self, next: RunState) -> Result<(), SitemapError> {
        self.state = self.state.transition(next)?;
        Ok(())
    }

    fn finish(&mut self, next: RunState) {
        if let Err(e) = self.set_state(next) {
            tracing::warn!("{}", e);
        }
    }

    fn page_limit_reached(&self) -> bool {
        self.max_pages
            .map_or(false, |limit| self.results.len() >= limit)
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Waits for the whole batch and returns task outputs in dispatch order
///
/// Dropping the returned future aborts whatever is still running.
async fn join_batch(
    mut tasks: JoinSet<(usize, Option<CrawledPage>)>,
    size: usize,
) -> Result<Vec<Option<CrawledPage>>, JoinError> {
    let mut slots: Vec<Option<CrawledPage>> = (0..size).map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        let (slot, page) = joined?;
        slots[slot] = page;
    }

    Ok(slots)
}

/// Fetches one target and extracts what the run needs from it
///
/// Returns `None` when the fetch produced nothing to record. Links are only
/// returned when the target is shallower than `max_depth`.
async fn crawl_target(
    client: Client,
    target: CrawlTarget,
    max_depth: Option<u32>,
    cancel: CancellationToken,
) -> Option<CrawledPage> {
    let fetched = fetch_page(&client, &target.url, &cancel).await?;

    let parsed = if fetched.has_html() {
        parse_html(&fetched.body, &target.url)
    } else {
        ParsedPage::default()
    };

    let follow_links = max_depth.map_or(true, |max| target.depth < max);
    let links = if follow_links { parsed.links } else { Vec::new() };

    tracing::debug!(
        "Crawled {} (depth {}, status {}, {} links)",
        target.url,
        target.depth,
        fetched.status,
        links.len()
    );

    Some(CrawledPage {
        page: PageResult::new(
            target.url.as_str(),
            target.depth,
            parsed.title,
            Some(fetched.status),
        ),
        links,
    })
}
