//! Retrieve-then-answer entry point.

use std::sync::Arc;

use kb_core::{Answer, Result};
use kb_retrieval::{ArticleSearch, RetrievalOrchestrator};
use tracing::{debug, info};

use crate::service::AnswerService;

/// Articles retrieved per question unless the caller asks otherwise.
pub const DEFAULT_ASK_LIMIT: usize = 3;

/// Suggestion returned when no article matches a question.
pub const NO_ARTICLES_SUGGESTION: &str =
    "No relevant articles found. Consider creating a new knowledge base article.";

/// Answers questions from the articles of one tenant and project.
pub struct KnowledgeAssistant {
    retrieval: Arc<RetrievalOrchestrator>,
    answers: AnswerService,
}

impl KnowledgeAssistant {
    /// Combine a retrieval orchestrator with an answer service.
    pub fn new(retrieval: Arc<RetrievalOrchestrator>, answers: AnswerService) -> Self {
        Self { retrieval, answers }
    }

    /// The underlying answer service.
    pub fn answers(&self) -> &AnswerService {
        &self.answers
    }

    /// Retrieve up to `limit` articles (internal ones included) and answer from them.
    ///
    /// # Errors
    /// Propagates retrieval failures; generation failures degrade to the fallback answer
    pub async fn ask(
        &self,
        question: &str,
        tenant_id: &str,
        project_id: &str,
        limit: usize,
    ) -> Result<Answer> {
        let request = ArticleSearch::new(question, tenant_id, project_id).with_limit(limit);
        let sources = self.retrieval.search_articles(&request).await?;

        if sources.is_empty() {
            info!("No articles matched question for tenant {tenant_id}");
            return Ok(Answer {
                question: question.to_owned(),
                answer_text: String::default(),
                confidence: 0.0,
                sources,
                has_answer: false,
                suggestions: vec![NO_ARTICLES_SUGGESTION.to_owned()],
                reasoning: "No knowledge base articles matched".to_owned(),
            });
        }

        debug!("Answering from {} articles", sources.len());
        Ok(self.answers.answer_question(question, sources, None).await)
    }
}
