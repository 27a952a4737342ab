//! Error kinds for the shared store.
//!
//! Callers react differently to each: an unavailable container asks for a
//! setup hint, a failed write asks for a retry, and "not found" is never an
//! error at all.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Shared container unavailable at {path}: {reason}")]
    StorageUnavailable { path: PathBuf, reason: String },

    #[error("Failed to commit {operation}: {source}")]
    WriteFailed {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to read {what}: {source}")]
    ReadFailed {
        what: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::WriteFailed { .. })
    }
}

/// SQLite BUSY and LOCKED mean another process holds the database; one more
/// attempt usually succeeds.
pub fn is_transient(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked)
    )
}

/// Rejects blank identifiers before they reach the database.
pub fn require_identifier(kind: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!("{} identifier cannot be empty", kind)));
    }
    Ok(())
}
