//! # Error Types
//!
//! Errors raised by the shared storage adapters.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the append-only log and the directory lock.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure while reading or writing.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A frame in the middle of the log cannot be decoded.
    #[error("Log corrupted at frame {frame} (offset {offset}): {reason}")]
    Corrupted {
        frame: u64,
        offset: u64,
        reason: String,
    },

    /// Another process holds the data directory.
    #[error("Data directory already in use by process {pid:?} ({})", .path.display())]
    Locked { pid: Option<u32>, path: PathBuf },

    /// Injected failure (test adapters only).
    #[error("Injected storage failure: {0}")]
    Injected(String),
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
