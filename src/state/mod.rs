//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the persisted crawl frontier (last processed listing page)
//! - `Action`: the resume policy chosen when a previous run left state behind
//! - `RunOutcome`: how a run that did not fail came to an end

mod action;
mod crawl_state;

// Re-export main types
pub use action::{Action, RunOutcome, SeenUrl};
pub use crawl_state::CrawlState;
