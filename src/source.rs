//! Record-source seam between the rollup engine and whatever owns the data.
//!
//! The engine's contract with its data source is a single read per
//! aggregation call: an inclusive time range in, a record sequence out. How
//! the records are stored — a database, an event log, a flat file — is the
//! source's business.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::rollup::{BoxError, Record};

/// A supplier of raw `(timestamp, value)` records for a time range.
pub trait RecordSource {
    /// Yield the records whose timestamps fall in the inclusive
    /// `[from, to]` range. Order is not required; the engine copes with
    /// unsorted input.
    fn fetch(&self, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<Record>, BoxError>;
}

fn in_range(record: &Record, from: NaiveDateTime, to: NaiveDateTime) -> bool {
    record.timestamp >= from && record.timestamp <= to
}

// ---------------------------------------------------------------------------
// MemorySource
// ---------------------------------------------------------------------------

/// An in-memory record source, mainly for tests and embedding callers that
/// already hold their records.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    records: Vec<Record>,
}

impl MemorySource {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl RecordSource for MemorySource {
    fn fetch(&self, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<Record>, BoxError> {
        Ok(self
            .records
            .iter()
            .copied()
            .filter(|r| in_range(r, from, to))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// JsonFileSource
// ---------------------------------------------------------------------------

/// Errors from loading a JSON records file.
#[derive(Debug, Error)]
pub enum JsonSourceError {
    #[error("failed to read records file `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse records file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A record source backed by a JSON file holding an array of
/// `{"dt": ..., "value": ...}` documents.
///
/// The file is read and parsed once at construction so malformed input
/// surfaces immediately; [`RecordSource::fetch`] then only filters.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    records: Vec<Record>,
}

impl JsonFileSource {
    pub fn from_path(path: &Path) -> Result<Self, JsonSourceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| JsonSourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<Record> =
            serde_json::from_str(&raw).map_err(|source| JsonSourceError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for JsonFileSource {
    fn fetch(&self, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<Record>, BoxError> {
        Ok(self
            .records
            .iter()
            .copied()
            .filter(|r| in_range(r, from, to))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
