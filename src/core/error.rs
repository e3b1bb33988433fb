use std::io;

use thiserror::Error;

/// Result alias used across the core.
pub type HubResult<T> = Result<T, HubError>;

/// Error type for partitioning, reassembly, storage and CSV handling.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("'{path}' not found in storage")]
    NotFound { path: String },
    #[error("dataset '{dataset}' is incomplete: missing groups {missing:?}, duplicated groups {duplicated:?}")]
    IncompleteDataset {
        dataset: String,
        missing: Vec<u32>,
        duplicated: Vec<u32>,
    },
    #[error("size mismatch in {context}: expected {expected} rows, found {actual}")]
    SizeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },
    #[error("group {group} of '{dataset}' is already marked done")]
    GroupClosed { dataset: String, group: u32 },
    #[error("malformed CSV: {0}")]
    MalformedCsv(String),
    #[error("malformed manifest: {0}")]
    MalformedManifest(#[from] serde_json::Error),
    #[error("storage failure: {0}")]
    StorageFailure(#[from] io::Error),
}

impl From<csv::Error> for HubError {
    fn from(error: csv::Error) -> Self {
        // csv wraps io errors from the underlying reader; keep those as storage failures
        if error.is_io_error() {
            match error.into_kind() {
                csv::ErrorKind::Io(io_error) => return HubError::StorageFailure(io_error),
                other => return HubError::MalformedCsv(format!("{:?}", other)),
            }
        }
        HubError::MalformedCsv(error.to_string())
    }
}

impl HubError {
    /// Shorthand for a `NotFound` error on an object path.
    pub fn not_found(path: impl Into<String>) -> Self {
        HubError::NotFound { path: path.into() }
    }

    /// True for conditions the caller can recover from (e.g. a missing object).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HubError::NotFound { .. })
    }
}
