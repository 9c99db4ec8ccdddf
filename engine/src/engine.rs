//! The suggestion engine facade.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use canto_fetcher::{GoogleInputProvider, RetryPolicy, RetryingFetcher, SuggestionProvider};
use canto_suggestion_store::{now_millis, Page, SuggestionStore, REQUEST_PAGE_MIN};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::inflight::InflightRegistry;

/// The suggestion retrieval-and-cache engine.
///
/// One explicitly constructed instance owns the store handle, the
/// in-flight registry and the worker permits; callers share it by
/// reference or `Arc`. There is no ambient global.
///
/// Must be used from within a tokio runtime: dispatched fetches are
/// spawned tasks.
pub struct SuggestionEngine {
    /// Durable suggestion cache.
    store: Arc<SuggestionStore>,

    /// Retrying network fetcher.
    fetcher: Arc<RetryingFetcher<Arc<dyn SuggestionProvider>>>,

    /// Fetches currently in flight, by query and depth.
    inflight: Arc<InflightRegistry>,

    /// Worker-pool permits bounding concurrent fetches.
    permits: Arc<Semaphore>,

    /// Cleared by `shutdown`; no new fetches are dispatched after that.
    accepting: AtomicBool,
}

impl SuggestionEngine {
    /// Create an engine talking to the configured remote endpoint.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let provider: Arc<dyn SuggestionProvider> = Arc::new(
            GoogleInputProvider::new()
                .with_base_url(config.endpoint.clone())
                .with_language_tag(config.language_tag.clone()),
        );
        Self::with_provider(config, provider)
    }

    /// Create an engine over a custom provider (tests, alternative
    /// transports).
    pub fn with_provider(
        config: EngineConfig,
        provider: Arc<dyn SuggestionProvider>,
    ) -> Result<Self> {
        let store = SuggestionStore::open(&config.cache_path)?;
        let policy = RetryPolicy {
            max_retries: config.fetch.max_retries,
            initial_backoff: Duration::from_millis(config.fetch.initial_backoff_ms),
        };
        let fetcher = RetryingFetcher::new(provider).with_policy(policy);

        info!(
            cache = %config.cache_path.display(),
            workers = config.max_workers,
            "Suggestion engine initialized"
        );

        Ok(Self {
            store: Arc::new(store),
            fetcher: Arc::new(fetcher),
            inflight: Arc::new(InflightRegistry::new()),
            permits: Arc::new(Semaphore::new(config.max_workers)),
            accepting: AtomicBool::new(true),
        })
    }

    /// Register freshly typed input, warming the cache for it.
    ///
    /// Fire-and-forget: never blocks the caller and never reports an
    /// outcome. A no-op when the query is empty, when the cached record
    /// already holds enough pages (or is exhausted), or when a fetch for
    /// it is already in flight.
    pub fn register_input(&self, query: &str) {
        if query.is_empty() {
            return;
        }
        match self.store.get(query) {
            Ok(Some(record))
                if record.is_exhausted() || record.requested_pages >= REQUEST_PAGE_MIN =>
            {
                return;
            }
            Ok(_) => {}
            Err(e) => {
                error!(query, "Store lookup failed: {e}");
                return;
            }
        }
        self.dispatch(query, REQUEST_PAGE_MIN);
    }

    /// Serve one page of suggestions from the cache.
    ///
    /// Returns `None` when nothing is cached yet (and registers the query
    /// as a side effect); callers poll or retry later. `page_num` is
    /// clamped into the range of fetched pages. Reading near the cached
    /// boundary of a non-exhausted record triggers a page-doubling
    /// prefetch, so the cache stays ahead of the reading cursor.
    pub fn get_page(&self, query: &str, page_num: u32) -> Option<Page> {
        let record = match self.store.get(query) {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.register_input(query);
                return None;
            }
            Err(e) => {
                error!(query, "Store lookup failed: {e}");
                return None;
            }
        };

        let page = record.page(page_num)?;
        if !record.is_exhausted() && page.page_num >= record.requested_pages / 2 {
            let deeper = (record.requested_pages * 2).min(record.max_pages);
            self.dispatch(query, deeper);
        }
        Some(page)
    }

    /// Shut the engine down: stop accepting new fetch dispatches and run
    /// the eviction sweep. Idempotent and non-blocking; fetches already
    /// running finish or fail on their own.
    pub fn shutdown(&self) {
        if !self.accepting.swap(false, Ordering::SeqCst) {
            return;
        }
        self.permits.close();

        // Best-effort: a failed sweep is retried at the next shutdown.
        if let Err(e) = self.store.sweep(now_millis()) {
            error!("Eviction sweep failed: {e}");
        }
        info!("Suggestion engine shut down");
    }

    /// Dispatch a fetch for `pages` pages of `query` to the worker pool,
    /// unless an equal-or-deeper fetch is already in flight.
    fn dispatch(&self, query: &str, pages: u32) {
        if !self.accepting.load(Ordering::SeqCst) {
            return;
        }
        if !self.inflight.try_begin(query, pages) {
            debug!(query, pages, "Fetch already in flight, skipping dispatch");
            return;
        }

        let query = query.to_string();
        let store = Arc::clone(&self.store);
        let fetcher = Arc::clone(&self.fetcher);
        let inflight = Arc::clone(&self.inflight);
        let permits = Arc::clone(&self.permits);

        tokio::spawn(async move {
            // Queue on the worker pool; a closed semaphore means the
            // engine shut down before this dispatch got a worker.
            let Ok(_permit) = permits.acquire_owned().await else {
                inflight.finish(&query, pages);
                return;
            };

            match fetcher.fetch(&query, pages).await {
                Ok(result) => match store.put(&result) {
                    Ok(true) => debug!(query, pages, "Cached fetch result"),
                    Ok(false) => debug!(query, "Fetch result was stale, discarded"),
                    Err(e) => error!(query, "Failed to cache fetch result: {e}"),
                },
                // Already logged by the fetcher; the cleared in-flight
                // entry below lets future requests retry fresh.
                Err(_) => {}
            }
            inflight.finish(&query, pages);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_engine_creation() {
        let temp_dir = TempDir::new().unwrap();
        let config = EngineConfig::new(temp_dir.path().join("cache.sqlite"));

        let engine = SuggestionEngine::new(config).unwrap();
        assert!(engine.accepting.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let config = EngineConfig::new(temp_dir.path().join("cache.sqlite"));

        let engine = SuggestionEngine::new(config).unwrap();
        engine.shutdown();
        engine.shutdown();
        assert!(!engine.accepting.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_empty_query_is_a_noop() {
        let temp_dir = TempDir::new().unwrap();
        let config = EngineConfig::new(temp_dir.path().join("cache.sqlite"));

        let engine = SuggestionEngine::new(config).unwrap();
        engine.register_input("");
        assert_eq!(engine.inflight.depth(""), None);
    }
}
