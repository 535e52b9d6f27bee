//! Embedding providers: the Ollama client and a deterministic fake for tests.

#[cfg(any(test, feature = "test-util"))]
mod fake;
mod ollama;

#[cfg(any(test, feature = "test-util"))]
pub use fake::FakeEmbeddingClient;
pub use ollama::OllamaEmbeddingClient;
