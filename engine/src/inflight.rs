//! In-flight fetch bookkeeping.
//!
//! Maps each query to the highest page depth currently being fetched for
//! it. The registry is the dedup point: at most one in-flight fetch per
//! query per depth tier, and a deeper request supersedes the entry without
//! duplicating a shallower fetch already running.

use std::collections::HashMap;
use std::sync::Mutex;

/// Ephemeral registry of fetches in flight.
///
/// Guarded by a plain mutex; the lock is only ever held for the map
/// operation itself, never across a network call or an await point.
#[derive(Debug, Default)]
pub struct InflightRegistry {
    entries: Mutex<HashMap<String, u32>>,
}

impl InflightRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim a fetch for `query` at depth `pages`.
    ///
    /// Returns `false` when a fetch at an equal or greater depth is
    /// already in flight; otherwise records the new depth (superseding any
    /// shallower entry) and returns `true`.
    pub fn try_begin(&self, query: &str, pages: u32) -> bool {
        let mut entries = self.lock();
        match entries.get(query) {
            Some(&depth) if depth >= pages => false,
            _ => {
                entries.insert(query.to_string(), pages);
                true
            }
        }
    }

    /// Clear the entry for a completed fetch.
    ///
    /// A fetch that was superseded by a deeper one leaves the deeper
    /// marker in place: only the entry matching this fetch's own depth is
    /// removed.
    pub fn finish(&self, query: &str, pages: u32) {
        let mut entries = self.lock();
        if entries.get(query) == Some(&pages) {
            entries.remove(query);
        }
    }

    /// Depth currently in flight for a query, if any.
    pub fn depth(&self, query: &str) -> Option<u32> {
        self.lock().get(query).copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, u32>> {
        // A poisoned lock only means another fetch task panicked; the map
        // itself is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
