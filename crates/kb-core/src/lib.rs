//! Core types and traits for the knowledge-base assistant.
//!
//! This crate provides the domain value objects, error handling, configuration
//! and the provider trait definitions shared by the retrieval and answering crates.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Test allows"
    )
)]

/// Configuration loading and defaults.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Conjunctive metadata filters for vector search.
pub mod filter;
/// Lock helpers shared by in-process adapters.
pub mod sync;
/// Trait definitions for the external collaborators.
pub mod traits;
/// Domain value objects.
pub mod types;

pub use config::{
    EmbeddingConfig, GenerationConfig, KbConfig, OllamaConfig, QdrantConfig, SearchConfig,
};
pub use error::{Error, Result};
pub use filter::{FieldCondition, FieldValue, MatchCondition, SearchFilter};
pub use sync::IgnoreLock;
pub use traits::{EmbeddingProvider, GenerationProvider, VectorIndex};
pub use types::{
    Answer, Chunk, Embedding, IndexedArticle, Payload, RetrievedArticle, ScoredPoint, SearchOptions,
    SearchPage, SimilarityResult, VectorQuery,
};
