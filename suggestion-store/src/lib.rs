//! # Suggestion Store
//!
//! Durable cache of remote transliteration suggestions, keyed by the typed
//! romanization query. One record per distinct query string, created or
//! replaced only by a completed fetch and deleted only by the eviction
//! sweep that runs at engine shutdown.
//!
//! ## Features
//!
//! - **Persistence**: SQLite (WAL) store that survives process restarts
//! - **Concurrent access**: pooled read-only connections, one writer
//! - **Compact encoding**: suggestion lists persisted as compressed blobs
//! - **Eviction**: bounded on-disk growth via a shutdown-time sweep

pub mod codec;
pub mod error;
pub mod eviction;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::SuggestionStore;
pub use types::{
    CachedResult, Page, Suggestion, DEFAULT_MAX_PAGES, PAGE_SIZE, REQUEST_PAGE_MIN,
};

/// Current time as unix milliseconds, the timestamp unit used throughout
/// the cache (requested_time, last_retrieved, eviction cutoffs).
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
