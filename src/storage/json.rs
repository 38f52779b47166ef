//! JSON file backend
//!
//! Records and state are written as indented, UTF-8 JSON with non-ASCII
//! characters kept verbatim. Each save writes a sibling temp file and renames
//! it over the target, so a crash mid-write leaves the previous document.

use crate::crawler::Record;
use crate::state::CrawlState;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Persistence backed by two JSON documents
#[derive(Debug, Clone)]
pub struct JsonStorage {
    records_path: PathBuf,
    state_path: PathBuf,
}

impl JsonStorage {
    pub fn new(records_path: impl Into<PathBuf>, state_path: impl Into<PathBuf>) -> Self {
        Self {
            records_path: records_path.into(),
            state_path: state_path.into(),
        }
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }
}

impl Storage for JsonStorage {
    fn load_records(&self) -> StorageResult<Vec<Record>> {
        load_records(&self.records_path)
    }

    fn save_records(&self, records: &[Record]) -> StorageResult<()> {
        save_records(records, &self.records_path)
    }

    fn load_state(&self) -> StorageResult<CrawlState> {
        load_state(&self.state_path)
    }

    fn save_state(&self, state: &CrawlState) -> StorageResult<()> {
        save_state(state, &self.state_path)
    }
}

/// Loads records from `path`; a missing file is an empty list
pub fn load_records(path: &Path) -> StorageResult<Vec<Record>> {
    Ok(load_document(path)?.unwrap_or_default())
}

/// Overwrites `path` with the complete record list
pub fn save_records(records: &[Record], path: &Path) -> StorageResult<()> {
    save_document(records, path)
}

/// Loads the crawl state from `path`; a missing file is an empty state
pub fn load_state(path: &Path) -> StorageResult<CrawlState> {
    Ok(load_document(path)?.unwrap_or_default())
}

/// Overwrites `path` with `state`
pub fn save_state(state: &CrawlState, path: &Path) -> StorageResult<()> {
    save_document(state, path)
}

fn load_document<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StorageError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Serializes with four-space indentation
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> StorageResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(buf)
}

fn save_document<T: Serialize + ?Sized>(value: &T, path: &Path) -> StorageResult<()> {
    let bytes = to_pretty_json(value)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    std::fs::write(&tmp_path, &bytes).map_err(write_err)?;
    std::fs::rename(&tmp_path, path).map_err(write_err)?;
    Ok(())
}
