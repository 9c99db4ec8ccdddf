//! Suggestion providers.
//!
//! The engine talks to the remote transliteration service through the
//! [`SuggestionProvider`] trait; tests substitute stub providers for the
//! real HTTP transport.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use canto_suggestion_store::Suggestion;

use crate::error::{FetchError, Result};

/// Language tag for traditional-script Cantonese transliteration.
pub const DEFAULT_LANGUAGE_TAG: &str = "yue-hant-t-i0-und";

/// Default remote endpoint.
pub const DEFAULT_BASE_URL: &str = "https://inputtools.google.com/request";

/// Trait for remote suggestion providers.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Fetch up to `num` suggestions for a query. A successful call may
    /// return fewer items than requested (the query is exhausted) or none
    /// at all.
    async fn fetch(&self, query: &str, num: usize) -> Result<Vec<Suggestion>>;
}

#[async_trait]
impl<P> SuggestionProvider for std::sync::Arc<P>
where
    P: SuggestionProvider + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch(&self, query: &str, num: usize) -> Result<Vec<Suggestion>> {
        (**self).fetch(query, num).await
    }
}

/// Google Input Tools transliteration provider.
pub struct GoogleInputProvider {
    /// HTTP client.
    client: reqwest::Client,

    /// Endpoint base URL.
    base_url: String,

    /// Language tag sent as `itc`.
    language_tag: String,
}

impl GoogleInputProvider {
    /// Create a provider against the default endpoint.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language_tag: DEFAULT_LANGUAGE_TAG.to_string(),
        }
    }

    /// Set the endpoint base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the language tag.
    pub fn with_language_tag(mut self, tag: impl Into<String>) -> Self {
        self.language_tag = tag.into();
        self
    }
}

impl Default for GoogleInputProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionProvider for GoogleInputProvider {
    fn name(&self) -> &str {
        "google-input-tools"
    }

    async fn fetch(&self, query: &str, num: usize) -> Result<Vec<Suggestion>> {
        debug!(query, num, "Requesting suggestions");

        let num = num.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("text", query),
                ("itc", self.language_tag.as_str()),
                ("num", num.as_str()),
                ("cp", "0"),
                ("cs", "1"),
                ("ie", "utf-8"),
                ("oe", "utf-8"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        decode_response(query, &body)
    }
}

/// Decode the positional response payload.
///
/// Shape: `[status, [[_, words[], _, {"annotation": [...],
/// "matched_length"?: [...]}]]]`. A missing `matched_length` array means
/// every suggestion consumes the entire query.
pub fn decode_response(query: &str, body: &Value) -> Result<Vec<Suggestion>> {
    let status = body
        .get(0)
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::InvalidResponse("missing status element".to_string()))?;
    if status != "SUCCESS" {
        return Err(FetchError::Protocol(status.to_string()));
    }

    // The result set for our single request; absent entirely when the
    // service has nothing to offer.
    let Some(result) = body.get(1).and_then(|v| v.get(0)) else {
        return Ok(Vec::new());
    };

    let words: Vec<&str> = result
        .get(1)
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::InvalidResponse("missing word list".to_string()))?
        .iter()
        .filter_map(Value::as_str)
        .collect();

    let detail = result.get(3);
    let annotations = detail
        .and_then(|d| d.get("annotation"))
        .and_then(Value::as_array);
    let matched_lengths = detail
        .and_then(|d| d.get("matched_length"))
        .and_then(Value::as_array);

    let whole_query = query.chars().count();
    let suggestions = words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let annotation = annotations
                .and_then(|a| a.get(i))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let matched_length = matched_lengths
                .and_then(|m| m.get(i))
                .and_then(Value::as_u64)
                .map_or(whole_query, |n| n as usize);
            Suggestion::new(*word, annotation, matched_length)
        })
        .collect();

    Ok(suggestions)
}
