//! Crawler module for listing traversal and notice scraping
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of listing and notice pages
//! - HTML extraction of links, pagination and data tables
//! - Per-notice scraping into ordered records
//! - Overall crawl coordination and resume handling

mod coordinator;
mod extract;
mod fetcher;
mod record;
mod scraper;

pub use coordinator::Coordinator;
pub use extract::{
    extract_document_links, extract_last_page_number, extract_table, has_data_tab,
    last_page_from_element, normalize_value,
};
pub use fetcher::{build_http_client, FetchResult, HttpFetcher, PageFetcher};
pub use record::{Record, URL_FIELD};
pub use self::scraper::{scrape, scrape_document_page, DocumentOutcome};

use crate::output::ActionPrompt;
use crate::state::Action;

/// Decides the resume policy for this run
///
/// Without prior state there is nothing to resume and the run continues from
/// page 1. Otherwise a preset action wins over asking `prompt`.
///
/// # Arguments
///
/// * `resume_point` - Last processed page left by a previous run
/// * `preset` - Action given up front (e.g. on the command line)
/// * `prompt` - Asked only when state exists and nothing was preset
pub fn choose_action<P>(
    resume_point: Option<u32>,
    preset: Option<Action>,
    prompt: &mut P,
) -> std::io::Result<Action>
where
    P: ActionPrompt + ?Sized,
{
    let Some(last_processed_page) = resume_point else {
        return Ok(Action::Continue);
    };

    match preset {
        Some(action) => Ok(action),
        None => prompt.choose_action(last_processed_page),
    }
}
