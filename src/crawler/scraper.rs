//! Document scraper: one notice's data tab -> one record

use crate::crawler::extract::{extract_table, has_data_tab};
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::record::{Record, URL_FIELD};
use scraper::Html;

/// Result of scraping one notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The data tab was present and its table was extracted
    Scraped(Record),
    /// The notice has no structured data tab (common, not an error)
    NoDataTab,
    /// The data page could not be fetched
    Unavailable(String),
}

/// Fetches a notice's data page and builds its record
///
/// The record's first field is `URL = main_page_url`, followed by the data
/// table rows. Cookies travel with `fetcher`.
pub async fn scrape<F>(fetcher: &F, data_page_url: &str, main_page_url: &str) -> DocumentOutcome
where
    F: PageFetcher + ?Sized,
{
    let body = match fetcher.fetch(data_page_url, &[]).await {
        FetchResult::Success { body } => body,
        FetchResult::Unavailable { reason } => return DocumentOutcome::Unavailable(reason),
    };

    match scrape_document_page(&body, main_page_url) {
        Some(record) => DocumentOutcome::Scraped(record),
        None => DocumentOutcome::NoDataTab,
    }
}

/// Builds a record from an already fetched data page
///
/// Returns `None` when the page's selected tab is not "Data"; the table is
/// only read after that check. A table row keyed `URL` never overrides the
/// canonical address.
pub fn scrape_document_page(body: &str, main_page_url: &str) -> Option<Record> {
    let page = Html::parse_document(body);

    if !has_data_tab(&page) {
        return None;
    }

    let mut record = Record::with_url(main_page_url);
    for (key, value) in extract_table(&page).iter() {
        if key == URL_FIELD {
            tracing::debug!("Ignoring table row '{}' on {}", URL_FIELD, main_page_url);
            continue;
        }
        record.insert(key, value);
    }

    Some(record)
}
