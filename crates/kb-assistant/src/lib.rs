//! Answer generation for the knowledge-base assistant: confidence scoring,
//! prompt templates, the Ollama generation client and the services that turn
//! retrieved articles into answers, summaries and keywords.
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

pub mod assistant;
pub mod confidence;
pub mod generation;
mod models;
pub mod prompts;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;
pub mod service;

pub use assistant::{DEFAULT_ASK_LIMIT, KnowledgeAssistant, NO_ARTICLES_SUGGESTION};
pub use confidence::AnswerConfidenceScorer;
pub use generation::OllamaGenerationClient;
#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedGenerator;
pub use service::{AnswerService, FALLBACK_ANSWER};
