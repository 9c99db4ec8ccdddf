//! SQLite-backed persistence for cached suggestion records.
//!
//! One writer connection guarded by a mutex plus a small pool of read-only
//! connections; WAL mode keeps readers from ever blocking each other or
//! waiting on the writer.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::debug;

use crate::codec;
use crate::error::{Result, StoreError};
use crate::types::CachedResult;

/// Number of pooled read connections.
const READ_POOL_SIZE: usize = 4;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        request TEXT NOT NULL UNIQUE,
        suggestions BLOB NOT NULL,
        cached_pages INTEGER NOT NULL,
        max_pages INTEGER NOT NULL,
        requested_time INTEGER NOT NULL,
        last_retrieved INTEGER NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS request_idx ON requests(request);
";

/// Durable mapping from query string to its cached fetch result.
pub struct SuggestionStore {
    /// The single write connection. A write holds this for its duration.
    writer: Mutex<Connection>,

    /// Round-robin pool of read-only connections.
    readers: ReadPool,
}

impl SuggestionStore {
    /// Open (and if necessary create) the store at the given path.
    ///
    /// The schema is bootstrapped here; re-opening an existing cache file
    /// is lossless.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let writer = Connection::open(path)?;
        writer.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            ",
        )?;
        writer.execute_batch(SCHEMA)?;

        // The writer must have created the file before read-only
        // connections can attach to it.
        let readers = ReadPool::open(path, READ_POOL_SIZE)?;

        debug!("Opened suggestion store at {}", path.display());
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
        })
    }

    /// Look up the cached record for a query, refreshing its
    /// `last_retrieved` timestamp on a hit.
    pub fn get(&self, query: &str) -> Result<Option<CachedResult>> {
        let row = self.readers.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT suggestions, cached_pages, max_pages, requested_time
                 FROM requests WHERE request = ?1",
            )?;
            let row = stmt
                .query_row(params![query], |row| {
                    Ok((
                        row.get::<_, Vec<u8>>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })
                .optional()?;
            Ok(row)
        })?;

        let Some((blob, cached_pages, max_pages, requested_time)) = row else {
            return Ok(None);
        };

        let suggestions = codec::decode(&blob)?;
        let now = crate::now_millis();
        self.with_writer(|conn| {
            conn.execute(
                "UPDATE requests SET last_retrieved = ?1 WHERE request = ?2",
                params![now, query],
            )?;
            Ok(())
        })?;

        Ok(Some(CachedResult {
            query: query.to_string(),
            suggestions,
            requested_pages: cached_pages,
            max_pages,
            requested_time,
            last_retrieved: now,
        }))
    }

    /// Insert or replace the record for `result.query`.
    ///
    /// Returns `false` without touching the row when the stored record
    /// carries a newer read-start time: a fetch that completes out of
    /// order must not clobber a newer result.
    pub fn put(&self, result: &CachedResult) -> Result<bool> {
        let blob = codec::encode(&result.suggestions)?;
        let mut conn = self
            .writer
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT requested_time FROM requests WHERE request = ?1",
                params![&result.query],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some_and(|stored| stored > result.requested_time) {
            debug!(query = %result.query, "Discarding stale write");
            return Ok(false);
        }

        tx.execute(
            "INSERT OR REPLACE INTO requests
                 (request, suggestions, cached_pages, max_pages,
                  requested_time, last_retrieved)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &result.query,
                blob,
                result.requested_pages,
                result.max_pages,
                result.requested_time,
                result.last_retrieved,
            ],
        )?;
        tx.commit()?;
        Ok(true)
    }

    /// Whether a record exists for the query.
    pub fn contains(&self, query: &str) -> Result<bool> {
        self.readers.with_conn(|conn| {
            let mut stmt =
                conn.prepare_cached("SELECT 1 FROM requests WHERE request = ?1")?;
            let hit = stmt.query_row(params![query], |_| Ok(())).optional()?;
            Ok(hit.is_some())
        })
    }

    /// Run a closure against the write connection.
    pub(crate) fn with_writer<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        f(&conn)
    }
}

/// A pool of read-only SQLite connections handed out round-robin.
struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    fn open(path: &Path, size: usize) -> Result<Self> {
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
            connections.push(Mutex::new(conn));
        }
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Execute a closure with a read connection from the pool.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let guard = self.connections[idx]
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        f(&guard)
    }
}
