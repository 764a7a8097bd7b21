//! Sumi-Sitemap main entry point
//!
//! This is the command-line interface for the Sumi-Sitemap crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_sitemap::config::{load_config_with_hash, Config};
use sumi_sitemap::crawler::{CrawlOutcome, Coordinator};
use sumi_sitemap::output::{
    export, print_statistics, ChannelSink, CrawlEvent, CrawlStatistics, CrawlSummary,
    ExportFormat,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Sitemap: a same-domain sitemap crawler
///
/// Sumi-Sitemap crawls a website from a seed URL, follows links on the same
/// host, and writes a sitemap of every page it reached.
#[derive(Parser, Debug)]
#[command(name = "sumi-sitemap")]
#[command(version = "1.0.0")]
#[command(about = "A same-domain sitemap crawler", long_about = None)]
struct Cli {
    /// Seed URL (https:// is assumed when no scheme is given)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Stop after this many pages (overrides the config file)
    #[arg(long)]
    max_pages: Option<usize>,

    /// Do not follow links found at this depth (overrides the config file)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Sitemap format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<ExportFormat>,

    /// Write the sitemap to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print crawl events to stdout as JSON lines instead of a sitemap
    #[arg(long)]
    events: bool,

    /// Print crawl statistics to stderr when the crawl completes
    #[arg(long)]
    stats: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_cli_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&cli, &config);
        return Ok(());
    }

    handle_crawl(&cli, config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout stays clean for the sitemap or event stream.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sitemap=info,warn"),
            1 => EnvFilter::new("sumi_sitemap=debug,info"),
            2 => EnvFilter::new("sumi_sitemap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file if one was given and applies CLI overrides
fn load_cli_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if cli.max_pages.is_some() {
        config.crawler.max_pages = cli.max_pages;
    }
    if cli.max_depth.is_some() {
        config.crawler.max_depth = cli.max_depth;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(cli: &Cli, config: &Config) {
    println!("=== Sumi-Sitemap Dry Run ===\n");

    println!("Seed: {}", cli.url);

    println!("\nCrawler Configuration:");
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);
    println!("  Max pages: {}", describe_limit(config.crawler.max_pages));
    println!("  Max depth: {}", describe_limit(config.crawler.max_depth));

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Format: {}", config.output.format);
    println!(
        "  Path: {}",
        config.output.path.as_deref().unwrap_or("<stdout>")
    );
}

fn describe_limit<T: std::fmt::Display>(limit: Option<T>) -> String {
    limit.map_or_else(|| "unbounded".to_string(), |l| l.to_string())
}

/// Handles the main crawl operation
///
/// The run executes on its own task while this task drains the event
/// channel. Ctrl-C cancels the run; partial results are not exported.
async fn handle_crawl(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(&config)?;
    let run = config.run_config(cli.url.clone());
    let cancel = CancellationToken::new();

    let (sink, mut events) = ChannelSink::channel();
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { coordinator.run(&run, &sink, run_cancel).await });

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current batch");
            interrupt.cancel();
        }
    });

    while let Some(event) = events.recv().await {
        if cli.events {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            log_event(&event);
        }
    }

    match handle.await?? {
        CrawlOutcome::Completed(summary) => {
            tracing::info!(
                "{} pages collected, {} with error status ({:.1}% ok)",
                summary.total_pages,
                summary.error_pages(),
                summary.success_rate()
            );
            if !cli.events {
                write_sitemap(&config, &summary)?;
            }
            if cli.stats {
                print_statistics(&CrawlStatistics::from_summary(&summary));
            }
            Ok(())
        }
        CrawlOutcome::Cancelled { results } => {
            tracing::warn!("Crawl cancelled with {} pages collected", results.len());
            Ok(())
        }
        CrawlOutcome::Failed { message, .. } => anyhow::bail!("Crawl failed: {}", message),
    }
}

fn log_event(event: &CrawlEvent) {
    match event {
        CrawlEvent::Start(start) => tracing::info!("Crawling {}", start.base_url),
        CrawlEvent::Url(url) => {
            tracing::debug!("[{}] {}", url.total, url.page.location)
        }
        CrawlEvent::Progress(progress) => tracing::info!(
            "Progress: {} pages crawled, {} queued, {}ms elapsed",
            progress.crawled,
            progress.queued,
            progress.elapsed_ms
        ),
        CrawlEvent::Complete(summary) => tracing::info!(
            "Crawl completed: {} pages in {}ms",
            summary.total_pages,
            summary.elapsed_ms
        ),
        CrawlEvent::Error(error) => tracing::error!("Crawl failed: {}", error.message),
    }
}

fn write_sitemap(config: &Config, summary: &CrawlSummary) -> anyhow::Result<()> {
    let rendered = export(&summary.results, config.output.format)?;

    match &config.output.path {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write sitemap to {}", path))?;
            tracing::info!(
                "Sitemap with {} pages written to {}",
                summary.total_pages,
                path
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
