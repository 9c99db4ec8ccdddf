//! Shutdown-time eviction sweep.
//!
//! Ephemeral multi-character composition states embed partially-committed
//! text in the query, so long keys are mostly noise that would otherwise
//! accumulate forever. Short, common queries stay long-lived.

use rusqlite::params;
use tracing::info;

use crate::error::Result;
use crate::store::SuggestionStore;

/// Queries longer than this are deleted regardless of recency.
const MAX_QUERY_CHARS: i64 = 50;

/// Queries longer than this decay on the fast schedule.
const LONG_QUERY_CHARS: i64 = 20;

/// Fast decay: 7 days, in milliseconds.
const FAST_DECAY_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Slow decay: 30 days, in milliseconds.
const SLOW_DECAY_MS: i64 = 30 * 24 * 60 * 60 * 1000;

impl SuggestionStore {
    /// Delete, in one pass, every record that is oversized or has not been
    /// read recently enough. Returns the number of records deleted.
    ///
    /// Best-effort: a failed sweep is retried at the next shutdown.
    pub fn sweep(&self, now: i64) -> Result<usize> {
        let deleted = self.with_writer(|conn| {
            let deleted = conn.execute(
                "DELETE FROM requests WHERE
                     length(request) > ?1 OR
                     last_retrieved < (?3 - ?4) OR
                     (length(request) > ?2 AND last_retrieved < (?3 - ?5))",
                params![
                    MAX_QUERY_CHARS,
                    LONG_QUERY_CHARS,
                    now,
                    SLOW_DECAY_MS,
                    FAST_DECAY_MS,
                ],
            )?;
            Ok(deleted)
        })?;
        if deleted > 0 {
            info!("Evicted {deleted} cached suggestion records");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CachedResult, Suggestion};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn record(query: &str, age_days: i64, now: i64) -> CachedResult {
        CachedResult::new(
            query,
            vec![Suggestion::new("詞", "ci", 2)],
            1,
            32,
            now - age_days * DAY_MS,
        )
    }

    #[test]
    fn test_oversized_query_deleted_regardless_of_recency() {
        let temp_dir = TempDir::new().unwrap();
        let store = SuggestionStore::open(temp_dir.path().join("cache.sqlite")).unwrap();
        let now = crate::now_millis();

        let query = "a".repeat(60);
        store.put(&record(&query, 0, now)).unwrap();

        assert_eq!(store.sweep(now).unwrap(), 1);
        assert!(!store.contains(&query).unwrap());
    }

    #[test]
    fn test_old_record_deleted() {
        let temp_dir = TempDir::new().unwrap();
        let store = SuggestionStore::open(temp_dir.path().join("cache.sqlite")).unwrap();
        let now = crate::now_millis();

        store.put(&record("hoenggong", 40, now)).unwrap();

        assert_eq!(store.sweep(now).unwrap(), 1);
        assert!(!store.contains("hoenggong").unwrap());
    }

    #[test]
    fn test_recent_short_record_retained() {
        let temp_dir = TempDir::new().unwrap();
        let store = SuggestionStore::open(temp_dir.path().join("cache.sqlite")).unwrap();
        let now = crate::now_millis();

        store.put(&record("hoenggong", 10, now)).unwrap();

        assert_eq!(store.sweep(now).unwrap(), 0);
        assert!(store.contains("hoenggong").unwrap());
    }

    #[test]
    fn test_medium_query_decays_faster() {
        let temp_dir = TempDir::new().unwrap();
        let store = SuggestionStore::open(temp_dir.path().join("cache.sqlite")).unwrap();
        let now = crate::now_millis();

        // 25 chars, 10 days old: past the 7-day fast decay.
        let medium = "a".repeat(25);
        store.put(&record(&medium, 10, now)).unwrap();
        // 10 chars, 10 days old: within the 30-day slow decay.
        store.put(&record("hoenggong1", 10, now)).unwrap();

        assert_eq!(store.sweep(now).unwrap(), 1);
        assert!(!store.contains(&medium).unwrap());
        assert!(store.contains("hoenggong1").unwrap());
    }
}
