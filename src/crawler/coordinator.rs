//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that:
//! - Loads the accumulated records and the crawl position
//! - Walks listing pages from the resume point up to the last page
//! - Applies the resume policy to notices collected by earlier runs
//! - Scrapes every new notice and persists records and position as it goes
//! - Flushes everything on completion, interruption or failure

use crate::config::{Config, SessionCookies, SiteConfig};
use crate::crawler::extract::{extract_document_links, extract_last_page_number};
use crate::crawler::fetcher::{FetchResult, HttpFetcher, PageFetcher};
use crate::crawler::record::Record;
use crate::crawler::scraper::{scrape, DocumentOutcome};
use crate::output::{
    estimate_remaining, format_duration, Notice, Notifier, RunSummary, TracingNotifier,
};
use crate::state::{Action, CrawlState, RunOutcome, SeenUrl};
use crate::storage::{open_storage, JsonStorage, Storage};
use crate::url::DocumentUrls;
use crate::ScraperError;
use scraper::Html;
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

/// Main crawler coordinator structure
///
/// Owns the only mutable crawl data: the record set, its URL index and the
/// crawl state. Everything runs sequentially on one task.
pub struct Coordinator<F, S> {
    fetcher: F,
    storage: S,
    site: SiteConfig,
    request_delay: Duration,
    notifier: Box<dyn Notifier>,
    records: Vec<Record>,
    seen_urls: HashSet<String>,
    state: CrawlState,
    summary: RunSummary,
}

impl Coordinator<HttpFetcher, JsonStorage> {
    /// Coordinator wired to the live site and the configured JSON files
    pub fn live(config: &Config, cookies: &SessionCookies) -> Result<Self, ScraperError> {
        let fetcher = HttpFetcher::from_config(&config.crawler, cookies)?;
        let storage = open_storage(&config.output);
        Self::new(config, fetcher, storage)
    }
}

impl<F, S> Coordinator<F, S>
where
    F: PageFetcher,
    S: Storage,
{
    /// Creates a coordinator and loads prior records and state
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Records and state loaded (missing files count as empty)
    /// * `Err(ScraperError)` - A stored document exists but could not be read
    pub fn new(config: &Config, fetcher: F, storage: S) -> Result<Self, ScraperError> {
        let records = storage.load_records()?;
        let state = storage.load_state()?;

        let seen_urls: HashSet<String> = records
            .iter()
            .filter_map(|record| record.url().map(str::to_string))
            .collect();

        if state.is_empty() {
            tracing::info!(
                "Loaded {} records ({} unique URLs), no prior crawl state",
                records.len(),
                seen_urls.len()
            );
        } else {
            tracing::info!(
                "Loaded {} records ({} unique URLs), last processed page: {}",
                records.len(),
                seen_urls.len(),
                state.resume_page()
            );
        }

        Ok(Self {
            fetcher,
            storage,
            site: config.site.clone(),
            request_delay: Duration::from_millis(config.crawler.request_delay_ms),
            notifier: Box::new(TracingNotifier),
            records,
            seen_urls,
            state,
            summary: RunSummary::new(),
        })
    }

    /// Replaces the notification sink
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Last processed page left by a previous run, if any
    pub fn resume_point(&self) -> Option<u32> {
        self.state.last_processed_page
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Runs the crawl until it ends or `shutdown` resolves
    ///
    /// The crawl future is dropped as soon as `shutdown` resolves, which aborts
    /// an in-flight request. Only complete records are ever in the record set,
    /// and it is written out on every exit path.
    ///
    /// # Returns
    ///
    /// * `Ok(RunOutcome)` - Completed, caught up (update pass) or interrupted
    /// * `Err(ScraperError)` - Fatal start-up condition or unexpected failure
    pub async fn run_until<Sd>(
        &mut self,
        action: Action,
        shutdown: Sd,
    ) -> Result<RunOutcome, ScraperError>
    where
        Sd: Future,
    {
        tracing::info!("Starting crawl run ({})", action);

        let result = tokio::select! {
            result = self.crawl(action) => result,
            _ = shutdown => Ok(RunOutcome::Interrupted),
        };

        match &result {
            Ok(RunOutcome::Interrupted) => self.notifier.notify(
                Notice::Stopped,
                "Process interrupted by user, saving data collected so far",
            ),
            Ok(_) => {}
            Err(e) => tracing::error!("Crawl aborted: {}", e),
        }

        match self.flush_records() {
            Ok(()) => {
                tracing::info!("Saved {} records", self.records.len());
            }
            Err(e) => {
                tracing::error!("Failed to save records: {}", e);
                if result.is_ok() {
                    return Err(e);
                }
            }
        }

        result
    }

    /// Runs the crawl to its natural end
    pub async fn run(&mut self, action: Action) -> Result<RunOutcome, ScraperError> {
        self.run_until(action, std::future::pending::<()>()).await
    }

    async fn crawl(&mut self, action: Action) -> Result<RunOutcome, ScraperError> {
        let search_url = self.site.search_url();

        let body = match self.fetcher.fetch(&search_url, &[]).await {
            FetchResult::Success { body } => body,
            FetchResult::Unavailable { reason } => {
                return Err(ScraperError::ListingUnavailable {
                    url: search_url,
                    reason,
                })
            }
        };

        let last_page = last_page_number(&body);
        if last_page == 0 {
            return Err(ScraperError::LastPageUnknown { url: search_url });
        }

        let start_page = action.start_page(self.state.resume_page());
        // The last page reported by the listing is never visited.
        tracing::info!(
            "Listing reports {} pages, visiting pages {} to {}",
            last_page,
            start_page,
            last_page.saturating_sub(1)
        );

        for page in start_page..last_page {
            if let Some(outcome) = self.process_page(&search_url, page, action).await? {
                return Ok(outcome);
            }

            let done = page - start_page + 1;
            let left = last_page - 1 - page;
            if let Some(eta) = estimate_remaining(done, left, self.summary.elapsed()) {
                tracing::info!(
                    "Page {} done, {} pages left, ~{} remaining",
                    page,
                    left,
                    format_duration(eta.as_secs())
                );
            }
        }

        Ok(RunOutcome::Completed)
    }

    /// Processes one listing page
    ///
    /// Returns `Some(outcome)` when the run must stop here.
    async fn process_page(
        &mut self,
        search_url: &str,
        page: u32,
        action: Action,
    ) -> Result<Option<RunOutcome>, ScraperError> {
        let links = match self
            .fetcher
            .fetch(search_url, &[("page", page.to_string())])
            .await
        {
            FetchResult::Success { body } => document_links(&body),
            FetchResult::Unavailable { reason } => {
                self.notifier.notify(
                    Notice::Failure,
                    &format!("Failed to retrieve page {}: {}", page, reason),
                );
                self.summary.pages_skipped += 1;
                return Ok(None);
            }
        };

        if links.is_empty() {
            self.notifier.notify(
                Notice::Failure,
                &format!("No notice links found on page {}", page),
            );
            self.summary.pages_skipped += 1;
            return Ok(None);
        }

        self.state.mark_page(page);
        self.storage.save_state(&self.state)?;
        self.summary.pages_visited += 1;

        for href in links {
            let urls = DocumentUrls::from_href(self.site.base(), &href);

            if self.seen_urls.contains(&urls.main) {
                match action.on_seen_url() {
                    SeenUrl::Skip => {
                        self.notifier.notify(
                            Notice::Skipped,
                            &format!("Already collected on page {}: {}", page, urls.main),
                        );
                        self.summary.already_collected += 1;
                        continue;
                    }
                    SeenUrl::Stop => {
                        self.notifier.notify(
                            Notice::Success,
                            &format!(
                                "Update complete: reached already collected notice {} on page {}",
                                urls.main, page
                            ),
                        );
                        return Ok(Some(RunOutcome::CaughtUp {
                            page,
                            url: urls.main,
                        }));
                    }
                }
            }

            self.notifier.notify(
                Notice::Progress,
                &format!("Working on URL on page {}: {}", page, urls.data),
            );

            match scrape(&self.fetcher, &urls.data, &urls.main).await {
                DocumentOutcome::Scraped(record) => {
                    self.append_record(record)?;
                    self.notifier.notify(
                        Notice::Success,
                        &format!("Fetched data on page {} from {}", page, urls.main),
                    );
                }
                DocumentOutcome::NoDataTab => {
                    self.summary.without_data += 1;
                    self.notifier.notify(
                        Notice::Skipped,
                        &format!("No data page for {} on page {}", urls.main, page),
                    );
                }
                DocumentOutcome::Unavailable(reason) => {
                    self.summary.unavailable += 1;
                    self.notifier.notify(
                        Notice::Failure,
                        &format!(
                            "Could not fetch data page {} on page {}: {}",
                            urls.data, page, reason
                        ),
                    );
                }
            }

            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        self.storage.save_state(&self.state)?;
        Ok(None)
    }

    /// Appends a record, indexes its URL and writes the record set
    fn append_record(&mut self, record: Record) -> Result<(), ScraperError> {
        if let Some(url) = record.url() {
            self.seen_urls.insert(url.to_string());
        }
        self.records.push(record);
        self.summary.records_scraped += 1;
        self.storage.save_records(&self.records)?;
        Ok(())
    }

    fn flush_records(&self) -> Result<(), ScraperError> {
        self.storage.save_records(&self.records)?;
        Ok(())
    }
}

fn document_links(body: &str) -> Vec<String> {
    extract_document_links(&Html::parse_document(body))
}

fn last_page_number(body: &str) -> u32 {
    extract_last_page_number(&Html::parse_document(body))
}
