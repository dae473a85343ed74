//! Error types for glossary search.

use thiserror::Error;

/// Result type alias for glossary operations.
pub type Result<T> = std::result::Result<T, GlossaryError>;

/// Main error type for the glossary search system.
///
/// Only [`GlossaryError::CorpusUnavailable`] is meant to reach the
/// user-visible layer; the semantic-stage and timestamp variants are
/// absorbed with graceful degradation.
#[derive(Debug, Error)]
pub enum GlossaryError {
    /// The topic or clip corpus could not be fetched.
    #[error("corpus unavailable: {0}")]
    CorpusUnavailable(String),

    /// The semantic collaborator has no vectorized corpus, or the
    /// availability check itself failed.
    #[error("semantic search unavailable: {0}")]
    SemanticUnavailable(String),

    /// The semantic collaborator failed or timed out after reporting
    /// availability.
    #[error("semantic search failed: {0}")]
    SemanticSearchFailed(String),

    /// A clip timestamp could not be parsed.
    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// A newer query was issued while this one was in flight; its result
    /// set must not be committed.
    #[error("search superseded by a newer query")]
    Superseded,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
