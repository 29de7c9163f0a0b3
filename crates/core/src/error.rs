use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadsError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to fetch {source_ref}: {reason}")]
    Transport { source_ref: String, reason: String },
    #[error("header row not found in {scanned} rows")]
    HeaderNotFound { scanned: usize },
    #[error("ingestion already in flight")]
    IngestionInFlight,
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("other: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LeadsError>;

impl LeadsError {
    pub(crate) fn transport(source_ref: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            source_ref: source_ref.into(),
            reason: reason.to_string(),
        }
    }

    /// True for failures that may succeed if ingestion is triggered again.
    /// Corrupt input stays corrupt, so `InvalidData` is never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            LeadsError::Transport { .. } => true,
            LeadsError::Io(err) => err.kind() != io::ErrorKind::InvalidData,
            _ => false,
        }
    }
}
