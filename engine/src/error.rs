//! Error types for the suggestion engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while constructing the engine.
///
/// Nothing else in the engine returns an error: `register_input` and
/// `get_page` swallow and log every failure, and callers only ever observe
/// "page not yet available".
#[derive(Error, Debug)]
pub enum EngineError {
    /// Suggestion store error. The cache is mandatory, so an unavailable
    /// store is fatal to engine construction.
    #[error("store error: {0}")]
    Store(#[from] canto_suggestion_store::StoreError),
}
