use async_trait::async_trait;

use crate::types::{Embedding, Payload, ScoredPoint, VectorQuery};
use crate::Result;

/// Maps text to fixed-length vectors.
///
/// Implementations are shared across concurrent requests and must not keep
/// per-call mutable state.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the unique identifier for this provider.
    fn name(&self) -> &'static str;

    /// Load or verify the embedding model.
    ///
    /// # Errors
    /// Returns an error if the model is not available or cannot be loaded
    async fn initialize(&self) -> Result<()>;

    /// Release the model; subsequent embed calls fail until re-initialized.
    async fn shutdown(&self);

    /// Generate the embedding for one text.
    ///
    /// # Errors
    /// Returns `EmbeddingUnavailable` if the model is not initialized or the call fails
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Embed several texts; output order matches input order one to one.
    ///
    /// # Errors
    /// Returns `EmbeddingUnavailable` if the model is not initialized or the call fails
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Embedding>>;
}

/// External store of `(id, vector, payload)` triples with filtered search.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Prepare the collection (create it when missing).
    ///
    /// # Errors
    /// Returns `RetrievalFailure` if the index cannot be reached
    async fn initialize(&self) -> Result<()>;

    /// Release the index handle.
    async fn shutdown(&self);

    /// Insert or replace a point.
    ///
    /// # Errors
    /// Returns `RetrievalFailure` on index errors, `InvalidInput` on a wrong dimension
    async fn upsert(&self, id: &str, vector: Embedding, payload: Payload) -> Result<()>;

    /// Remove a point; removing an unknown id succeeds.
    ///
    /// # Errors
    /// Returns `RetrievalFailure` on index errors
    async fn delete(&self, id: &str) -> Result<()>;

    /// Filtered nearest-neighbour search, hits sorted by descending score.
    ///
    /// # Errors
    /// Returns `RetrievalFailure` on index errors, `InvalidInput` on a wrong dimension
    async fn search(&self, query: VectorQuery) -> Result<Vec<ScoredPoint>>;
}

/// Text-generation endpoint.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Returns the unique identifier for this provider.
    fn name(&self) -> &'static str;

    /// Verify the generation model is present; never fatal.
    async fn initialize(&self);

    /// Release the generation client.
    async fn shutdown(&self);

    /// Generate a completion for the prompt.
    ///
    /// # Errors
    /// Returns `GenerationFailure` if the request fails or the response is malformed
    async fn generate(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String>;
}
