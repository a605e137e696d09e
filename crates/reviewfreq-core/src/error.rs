//! Error types for corpus ingestion
//!
//! Normalization itself never fails; these cover the record-level
//! failures of reading a labeled corpus.

use thiserror::Error;

/// Errors surfaced while loading or folding a corpus
#[derive(Debug, Error)]
pub enum Error {
    /// A record is missing its text or label, or carries the wrong type
    #[error("malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
