//! Crawl progress persisted between runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of the crawl frontier
///
/// An empty mapping (`{}` on disk, or no file at all) means no run has ever
/// started a page. `last_processed_page` is the highest listing page whose
/// documents have been (or are being) attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_processed_page: Option<u32>,

    /// When this state was last written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CrawlState {
    /// State positioned at `page`
    pub fn at_page(page: u32) -> Self {
        Self {
            last_processed_page: Some(page),
            updated_at: None,
        }
    }

    /// True when no prior run recorded a position
    pub fn is_empty(&self) -> bool {
        self.last_processed_page.is_none()
    }

    /// Page a `continue` run starts from (1 when nothing was recorded)
    pub fn resume_page(&self) -> u32 {
        self.last_processed_page.unwrap_or(1).max(1)
    }

    /// Moves the frontier to `page` and stamps the modification time
    pub fn mark_page(&mut self, page: u32) {
        self.last_processed_page = Some(page);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
