//! Output module for everything the operator sees
//!
//! This module handles:
//! - Progress notifications from the crawl loop
//! - Run summaries and record-file overviews
//! - The interactive resume prompt

mod notify;
mod prompt;
pub mod stats;

pub use notify::{MemoryNotifier, Notice, Notifier, TracingNotifier};
pub use prompt::{ActionPrompt, TerminalPrompt};
pub use stats::{
    estimate_remaining, format_duration, print_records_overview, print_run_summary,
    records_overview, RecordsOverview, RunSummary,
};
