//! Error types for the persistence layer.
//!
//! None of these reach the presentation layer: the public history and
//! settings operations log them and fall back to empty / `None` results.

use thiserror::Error;

/// Failure reported by a [`crate::storage::StoragePort`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// No storage backend (private browsing, disabled storage, no window).
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to read `{0}`")]
    Read(String),
    /// Write rejected, typically a quota error.
    #[error("failed to write `{0}`")]
    Write(String),
    #[error("failed to remove `{0}`")]
    Remove(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("history payload could not be encoded: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("unknown region code `{0}`")]
    UnknownMode(String),
    #[error("no history entry with id `{0}`")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("settings payload is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("settings version {saved} is older than the minimum compatible version {min}")]
    Incompatible { saved: u32, min: u32 },
}
