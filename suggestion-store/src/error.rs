//! Error types for the suggestion store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the suggestion store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying SQLite error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Suggestion blob could not be serialized or deserialized.
    #[error("blob codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Compression or decompression of the suggestion blob failed.
    #[error("blob compression error: {0}")]
    Compression(#[from] std::io::Error),

    /// A connection lock was poisoned by a panicking holder.
    #[error("connection lock poisoned: {0}")]
    LockPoisoned(String),
}
