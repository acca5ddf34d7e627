//! Store error types.

use thiserror::Error;

use suggest_types::SuggestError;

/// Errors that can occur while loading a graph snapshot
#[derive(Error, Debug)]
pub enum StoreError {
    /// Snapshot file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot is not valid JSON for the expected shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot parsed but is internally inconsistent
    #[error("Invalid snapshot: {0}")]
    Invalid(String),
}

impl From<StoreError> for SuggestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Serialization(e) => SuggestError::Serialization(e),
            other => SuggestError::Snapshot(other.to_string()),
        }
    }
}
