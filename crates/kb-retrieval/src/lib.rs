//! Retrieval pipeline for the knowledge-base assistant: chunking, similarity,
//! metadata filters, snippets and the search orchestrator.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        clippy::float_cmp,
        reason = "Test allows"
    )
)]

pub mod chunking;
pub mod embedding;
pub mod filter;
pub mod index;
pub mod orchestrator;
pub mod similarity;
pub mod snippet;

pub use chunking::{TextChunker, normalize_for_embedding};
#[cfg(any(test, feature = "test-util"))]
pub use embedding::FakeEmbeddingClient;
pub use embedding::OllamaEmbeddingClient;
pub use filter::FilterBuilder;
pub use index::{InMemoryVectorIndex, QdrantIndex};
pub use orchestrator::{ArticleSearch, RetrievalOrchestrator};
pub use similarity::cosine_similarity;
pub use snippet::{DEFAULT_SNIPPET_LENGTH, extract_snippet};
