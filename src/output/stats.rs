//! Run statistics and record-file overview
//!
//! This module tracks what a crawl run did and renders it, along with a
//! summary of an existing records file for `--stats`.

use crate::crawler::{Record, URL_FIELD};
use crate::state::{CrawlState, RunOutcome};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Counters for one crawl run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Listing pages whose documents were attempted
    pub pages_visited: u32,

    /// Listing pages skipped because they could not be fetched or had no links
    pub pages_skipped: u32,

    /// New records appended to the record set
    pub records_scraped: u64,

    /// Notices skipped because an earlier run collected them
    pub already_collected: u64,

    /// Notices without a data tab
    pub without_data: u64,

    /// Notices whose data page could not be fetched
    pub unavailable: u64,

    started: Instant,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            pages_visited: 0,
            pages_skipped: 0,
            records_scraped: 0,
            already_collected: 0,
            without_data: 0,
            unavailable: 0,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Notices that were fetched (successfully or not) during this run
    pub fn documents_attempted(&self) -> u64 {
        self.records_scraped + self.without_data + self.unavailable
    }
}

/// Formats a number of seconds as `"<h>h <m>m <s>s"`
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

/// Estimates time left from the average duration of finished pages
///
/// Returns `None` until at least one page has finished.
pub fn estimate_remaining(pages_done: u32, pages_left: u32, elapsed: Duration) -> Option<Duration> {
    if pages_done == 0 {
        return None;
    }
    let per_page = elapsed.as_secs_f64() / pages_done as f64;
    Some(Duration::from_secs_f64(per_page * pages_left as f64))
}

/// Prints a run summary to stdout
pub fn print_run_summary(summary: &RunSummary, outcome: &RunOutcome, total_records: usize) {
    println!("=== Crawl Summary ===\n");
    println!("Outcome: {}", outcome);
    println!("Elapsed: {}", format_duration(summary.elapsed().as_secs()));
    println!();

    println!("Pages:");
    println!("  Visited: {}", summary.pages_visited);
    println!("  Skipped: {}", summary.pages_skipped);
    println!();

    println!("Notices:");
    println!("  Scraped: {}", summary.records_scraped);
    println!("  Already collected: {}", summary.already_collected);
    println!("  Without data tab: {}", summary.without_data);
    println!("  Unavailable: {}", summary.unavailable);
    println!();

    let attempted = summary.documents_attempted();
    let success_rate = if attempted > 0 {
        (summary.records_scraped as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Success Rate: {:.1}% ({} / {} notices with data)",
        success_rate, summary.records_scraped, attempted
    );
    println!("Records on disk: {}", total_records);
}

/// Overview of an existing records file
#[derive(Debug, Clone, PartialEq)]
pub struct RecordsOverview {
    pub total_records: usize,
    pub last_processed_page: Option<u32>,
    /// Field names ordered by how many records carry them
    pub field_counts: Vec<(String, usize)>,
    /// Records that lack the `URL` field
    pub missing_url: usize,
    /// Records whose `URL` appears more than once
    pub duplicate_urls: usize,
}

/// Summarizes `records` and `state` for display
pub fn records_overview(records: &[Record], state: &CrawlState) -> RecordsOverview {
    let mut fields: HashMap<&str, usize> = HashMap::new();
    let mut urls: HashMap<&str, usize> = HashMap::new();
    let mut missing_url = 0;

    for record in records {
        for key in record.keys() {
            *fields.entry(key).or_default() += 1;
        }
        match record.url() {
            Some(url) => *urls.entry(url).or_default() += 1,
            None => missing_url += 1,
        }
    }

    let mut field_counts: Vec<(String, usize)> = fields
        .into_iter()
        .filter(|(name, _)| *name != URL_FIELD)
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    field_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    RecordsOverview {
        total_records: records.len(),
        last_processed_page: state.last_processed_page,
        field_counts,
        missing_url,
        duplicate_urls: urls.values().filter(|&&n| n > 1).map(|n| n - 1).sum(),
    }
}

/// Prints a records overview to stdout
pub fn print_records_overview(overview: &RecordsOverview, top_fields: usize) {
    println!("=== Records Overview ===\n");
    println!("Total records: {}", overview.total_records);
    match overview.last_processed_page {
        Some(page) => println!("Last processed page: {}", page),
        None => println!("Last processed page: (no state)"),
    }
    if overview.missing_url > 0 {
        println!("Records without URL: {}", overview.missing_url);
    }
    if overview.duplicate_urls > 0 {
        println!("Duplicate URLs: {}", overview.duplicate_urls);
    }
    println!();

    if !overview.field_counts.is_empty() {
        println!("Most common fields:");
        for (name, count) in overview.field_counts.iter().take(top_fields) {
            let percentage = if overview.total_records > 0 {
                (*count as f64 / overview.total_records as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", name, count, percentage);
        }
    }
}
