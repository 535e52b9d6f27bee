use core::result::Result as CoreResult;
use std::io::Error as IoError;

use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for knowledge-base operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur in the retrieval and answering pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller violated an input contract (mismatched vectors, bad options).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The embedding provider is not initialized or failed to embed.
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The vector index call failed or returned a malformed hit.
    #[error("Retrieval failed: {0}")]
    RetrievalFailure(String),

    /// The text-generation provider failed.
    #[error("Generation failed: {0}")]
    GenerationFailure(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),
}

impl Error {
    /// Determines whether this error may succeed if retried by the calling layer.
    ///
    /// Returns `true` for provider failures; contract violations and configuration
    /// problems are permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingUnavailable(_) | Self::RetrievalFailure(_) | Self::GenerationFailure(_)
        )
    }
}
