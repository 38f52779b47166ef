//! Storage traits and error types
//!
//! This module defines the trait interface for persistence backends and
//! associated error types.

use crate::crawler::Record;
use crate::state::CrawlState;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for persistence backends
///
/// Both documents are loaded once at startup and rewritten in full on every
/// save. A missing document loads as empty.
pub trait Storage {
    /// Loads the accumulated records, empty when none were saved yet
    fn load_records(&self) -> StorageResult<Vec<Record>>;

    /// Overwrites the stored records with `records`
    fn save_records(&self, records: &[Record]) -> StorageResult<()>;

    /// Loads the crawl position, empty when none was saved yet
    fn load_state(&self) -> StorageResult<CrawlState>;

    /// Overwrites the stored crawl position
    fn save_state(&self, state: &CrawlState) -> StorageResult<()>;
}
