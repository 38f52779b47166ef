//! TED scraper: a resumable, incremental crawler for the EU tenders portal
//!
//! This crate pages through a search-result listing, follows every notice link,
//! extracts the key/value table from each notice's "Data" tab and keeps the
//! accumulated records plus the crawl position on disk, so that a later run can
//! either continue where the previous one stopped or run an update pass that
//! stops at the first notice it has already seen.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Search listing unavailable at {url}: {reason}")]
    ListingUnavailable { url: String, reason: String },

    #[error("Could not determine the last page number from {url}")]
    LastPageUnknown { url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Record};
pub use state::{Action, CrawlState, RunOutcome};
pub use crate::url::derive_data_url;
