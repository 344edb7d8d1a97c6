//! Error types for news digest operations

use thiserror::Error;

/// News pipeline errors
///
/// Only a handful of these ever reach a pipeline caller: per-article
/// failures are absorbed into the digest as degraded results.
#[derive(Debug, Error)]
pub enum PulseError {
    /// Article source request failed
    #[error("News search failed: {0}")]
    SourceError(String),

    /// Article source returned something we could not parse
    #[error("Failed to parse news feed: {0}")]
    FeedParseError(String),

    /// Page download or body extraction failed
    #[error("Content extraction failed for {url}: {reason}")]
    ExtractionFailed {
        url: String,
        reason: String,
    },

    /// Text generation failed
    #[error("Text generation failed: {0}")]
    GenerationFailed(#[from] pulse_llm::LLMError),

    /// Prompt template failed to compile or render
    #[error("Prompt template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    /// Caller supplied an unusable parameter
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for news pipeline operations
pub type Result<T> = std::result::Result<T, PulseError>;
