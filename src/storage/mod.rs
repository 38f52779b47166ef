//! Storage module for persisting crawl data
//!
//! This module handles the two durable documents of a crawl:
//! - The accumulated records (a JSON array of ordered objects)
//! - The crawl state (a JSON object holding at least `last_processed_page`)
//!
//! Both are rewritten in full after every unit of work; there is no
//! append-only log.

mod json;
mod traits;

pub use json::{load_records, load_state, save_records, save_state, JsonStorage};
pub use traits::{Storage, StorageError, StorageResult};

use crate::config::OutputConfig;

/// Opens the JSON storage described by the output configuration
pub fn open_storage(config: &OutputConfig) -> JsonStorage {
    JsonStorage::new(&config.records_path, &config.state_path)
}
