//! Configuration for the suggestion engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use canto_fetcher::provider::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE_TAG};

/// Configuration for the suggestion engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path of the SQLite cache file.
    pub cache_path: PathBuf,

    /// Remote transliteration endpoint.
    pub endpoint: String,

    /// Language tag sent with every request.
    pub language_tag: String,

    /// Maximum number of concurrently running fetches. Excess dispatches
    /// queue; this caps outbound request fan-out from rapid typing.
    pub max_workers: usize,

    /// Fetch retry configuration.
    pub fetch: FetchConfig,
}

impl EngineConfig {
    /// Create a configuration with default values and the given cache path.
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            endpoint: DEFAULT_BASE_URL.to_string(),
            language_tag: DEFAULT_LANGUAGE_TAG.to_string(),
            max_workers: 20,
            fetch: FetchConfig::default(),
        }
    }

    /// Set the remote endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the language tag.
    pub fn with_language_tag(mut self, tag: impl Into<String>) -> Self {
        self.language_tag = tag.into();
        self
    }

    /// Set the fetch configuration.
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(
            dirs::data_dir()
                .unwrap_or_default()
                .join("canto/cache.sqlite"),
        )
    }
}

/// Configuration for fetch retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds; doubles each retry.
    pub initial_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 7,
            initial_backoff_ms: 100,
        }
    }
}
