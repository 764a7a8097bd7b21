//! State module for tracking a crawl run
//!
//! # Components
//!
//! - `RunState`: lifecycle of one crawl run (idle, running, completed, cancelled, failed)
//! - `PageResult`: the immutable record produced for every fetched page

mod page_result;
mod run_state;

// Re-export main types
pub use page_result::{change_frequency_for_depth, priority_for_depth, ChangeFrequency, PageResult};
pub use run_state::RunState;
