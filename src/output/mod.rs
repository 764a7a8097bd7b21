//! Output module for crawl events and results
//!
//! This module handles:
//! - The event sink interface the crawl engine reports through
//! - Ready-made sinks (channel, in-memory, tracing)
//! - Exporting a finished result set as XML, TXT, JSON or CSV
//! - Summary statistics

mod events;
mod export;
pub mod stats;
mod traits;

pub use events::{
    ChannelSink, CrawlEvent, ErrorEvent, MemorySink, ProgressEvent, StartEvent, TracingSink,
    UrlEvent,
};
pub use export::{
    export, generate_csv_sitemap, generate_json_sitemap, generate_txt_sitemap,
    generate_xml_sitemap, ExportFormat,
};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{CrawlSummary, EventSink, OutputError, OutputResult};
