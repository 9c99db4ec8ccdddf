//! Retry-with-backoff fetch and mapping into cache records.

use std::time::Duration;

use tracing::{debug, warn};

use canto_suggestion_store::{
    now_millis, CachedResult, Suggestion, DEFAULT_MAX_PAGES, PAGE_SIZE,
};

use crate::error::Result;
use crate::provider::SuggestionProvider;

/// Bounded exponential backoff parameters.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt (7 retries, 8 attempts total).
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each subsequent one.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 7,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

/// Performs one network round trip per invocation, retrying transient and
/// protocol failures with exponential backoff.
pub struct RetryingFetcher<P> {
    provider: P,
    policy: RetryPolicy,
}

impl<P> RetryingFetcher<P>
where
    P: SuggestionProvider,
{
    /// Create a fetcher with the default retry policy.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            policy: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch `pages` pages' worth of suggestions for a query and map the
    /// outcome into a cache record.
    ///
    /// The record's `requested_time` is the read-start time, taken before
    /// the first attempt: among concurrent fetches for the same query, the
    /// newest read-start wins the final store write, whatever the
    /// completion order.
    pub async fn fetch(&self, query: &str, pages: u32) -> Result<CachedResult> {
        let requested_time = now_millis();
        let num = pages as usize * PAGE_SIZE;

        let mut backoff = self.policy.initial_backoff;
        let mut attempt = 0u32;
        let suggestions = loop {
            match self.provider.fetch(query, num).await {
                Ok(suggestions) => break suggestions,
                Err(e) => {
                    attempt += 1;
                    if attempt > self.policy.max_retries {
                        warn!(
                            query,
                            attempts = attempt,
                            provider = self.provider.name(),
                            "Fetch failed permanently: {e}"
                        );
                        return Err(e);
                    }
                    debug!(query, attempt, "Fetch attempt failed, backing off: {e}");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        };

        Ok(build_result(query, suggestions, pages, requested_time))
    }
}

/// Map a successful remote response into a fully-populated record,
/// applying the exhaustion and zero-result rules.
fn build_result(
    query: &str,
    suggestions: Vec<Suggestion>,
    pages: u32,
    requested_time: i64,
) -> CachedResult {
    if suggestions.is_empty() {
        return CachedResult::fallback(query, requested_time);
    }

    let requested = pages as usize * PAGE_SIZE;
    if suggestions.len() < requested {
        // Fewer items than asked for: the service has no more candidates.
        // Tighten max_pages to the pages actually covered.
        let covered = suggestions.len().div_ceil(PAGE_SIZE) as u32;
        CachedResult::new(query, suggestions, covered, covered, requested_time)
    } else {
        CachedResult::new(
            query,
            suggestions,
            pages,
            DEFAULT_MAX_PAGES,
            requested_time,
        )
    }
}
