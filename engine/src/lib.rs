//! # Suggestion Engine
//!
//! The retrieval-and-cache engine behind a Cantonese transliteration input
//! method: given a typed romanization prefix, it serves paginated candidate
//! words, fetching them from the remote suggestion service on demand and
//! caching results durably for reuse.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Suggestion Engine                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  register_input ──► In-flight registry ──► Worker pool      │
//! │                                                │            │
//! │  get_page ──► Suggestion store ◄── Retrying fetcher         │
//! │                     │                          │            │
//! │                     ▼                          ▼            │
//! │              Eviction sweep            Remote endpoint      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use canto_engine::{EngineConfig, SuggestionEngine};
//!
//! let engine = SuggestionEngine::new(EngineConfig::default())?;
//! engine.register_input("hoeng");
//! // later, once a fetch has landed:
//! if let Some(page) = engine.get_page("hoeng", 0) {
//!     for suggestion in &page.suggestions {
//!         println!("{} ({})", suggestion.word, suggestion.annotation);
//!     }
//! }
//! engine.shutdown();
//! ```
//!
//! Callers never block on network I/O and never see a fetch failure: the
//! only observable outcome of any failure is "page not yet available",
//! which callers poll past.

pub mod config;
pub mod engine;
pub mod error;
pub mod inflight;

pub use config::{EngineConfig, FetchConfig};
pub use engine::SuggestionEngine;
pub use error::{EngineError, Result};

// Re-export from dependencies for convenience
pub use canto_fetcher::{GoogleInputProvider, SuggestionProvider};
pub use canto_suggestion_store::{CachedResult, Page, Suggestion, PAGE_SIZE};
