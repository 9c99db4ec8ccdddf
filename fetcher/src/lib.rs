//! # Fetcher
//!
//! Network retrieval of transliteration suggestions.
//!
//! ## Features
//!
//! - **Provider abstraction**: swap the HTTP transport for a stub in tests
//! - **Google Input Tools transport**: the default remote endpoint
//! - **Bounded retry**: exponential backoff over transient and protocol
//!   failures, then permanent failure for the invocation
//! - **Result mapping**: remote payloads become fully-populated
//!   [`CachedResult`](canto_suggestion_store::CachedResult) records,
//!   including the exhaustion and zero-result rules

pub mod error;
pub mod fetcher;
pub mod provider;

pub use error::{FetchError, Result};
pub use fetcher::{RetryPolicy, RetryingFetcher};
pub use provider::{GoogleInputProvider, SuggestionProvider};
