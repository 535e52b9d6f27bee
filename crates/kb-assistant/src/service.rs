//! Question answering and article authoring helpers over a generation provider.

use std::sync::Arc;

use kb_core::{Answer, GenerationConfig, GenerationProvider, Result, RetrievedArticle};
use tracing::{debug, error};

use crate::confidence::AnswerConfidenceScorer;
use crate::prompts::{
    answer_prompt, build_context, improvement_prompt, keywords_prompt, summary_prompt,
};

/// Answer returned when generation fails.
pub const FALLBACK_ANSWER: &str =
    "I'm sorry, I couldn't process your question at the moment. Please try again later.";
/// Reasoning attached to the fallback answer.
pub const FALLBACK_REASONING: &str = "AI service error";

/// Characters of content kept by the summary fallback.
const SUMMARY_FALLBACK_CHARS: usize = 200;
/// Keywords returned at most.
const MAX_KEYWORDS: usize = 10;
/// Keywords must be longer than this many characters.
const MIN_KEYWORD_LENGTH: usize = 2;

/// Turns retrieved articles and free text into generated answers.
pub struct AnswerService {
    generator: Arc<dyn GenerationProvider>,
    config: GenerationConfig,
}

impl AnswerService {
    /// Create a service over a shared generation provider.
    pub fn new(generator: Arc<dyn GenerationProvider>, config: GenerationConfig) -> Self {
        Self { generator, config }
    }

    /// Shut down the underlying generation provider.
    pub async fn shutdown(&self) {
        self.generator.shutdown().await;
    }

    /// Answer `question` from the given sources.
    ///
    /// Generation failures degrade to [`FALLBACK_ANSWER`] with zero confidence.
    pub async fn answer_question(
        &self,
        question: &str,
        sources: Vec<RetrievedArticle>,
        additional_context: Option<&str>,
    ) -> Answer {
        let context = build_context(&sources, additional_context, self.config.max_context_length);
        let prompt = answer_prompt(question, &context);

        match self.generate(&prompt).await {
            Ok(response) => {
                let answer = AnswerConfidenceScorer::build_answer(question, &response, sources);
                debug!(
                    "Answered question with confidence {:.2} (surfaced: {})",
                    answer.confidence, answer.has_answer
                );
                answer
            }
            Err(err) => {
                error!("Failed to answer question: {err}");
                Answer {
                    question: question.to_owned(),
                    answer_text: FALLBACK_ANSWER.to_owned(),
                    confidence: 0.0,
                    sources,
                    has_answer: false,
                    suggestions: Vec::default(),
                    reasoning: FALLBACK_REASONING.to_owned(),
                }
            }
        }
    }

    /// Short summary of an article; falls back to its leading text.
    pub async fn generate_summary(&self, title: &str, content: &str) -> String {
        match self.generate(&summary_prompt(title, content)).await {
            Ok(response) => {
                let summary = response.trim();
                summary
                    .strip_prefix("Summary:")
                    .map_or(summary, str::trim)
                    .to_owned()
            }
            Err(err) => {
                error!("Failed to generate summary: {err}");
                if content.chars().count() > SUMMARY_FALLBACK_CHARS {
                    let leading: String = content.chars().take(SUMMARY_FALLBACK_CHARS).collect();
                    format!("{leading}...")
                } else {
                    content.to_owned()
                }
            }
        }
    }

    /// Search keywords for an article; empty on failure.
    pub async fn suggest_keywords(&self, title: &str, content: &str) -> Vec<String> {
        match self.generate(&keywords_prompt(title, content)).await {
            Ok(response) => parse_keywords(&response),
            Err(err) => {
                error!("Failed to suggest keywords: {err}");
                Vec::default()
            }
        }
    }

    /// Rewrite `content` according to `feedback`; returns it unchanged on failure.
    pub async fn improve_content(&self, content: &str, feedback: &str) -> String {
        match self.generate(&improvement_prompt(content, feedback)).await {
            Ok(response) => response.trim().to_owned(),
            Err(err) => {
                error!("Failed to improve content: {err}");
                content.to_owned()
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generator
            .generate(prompt, self.config.temperature, self.config.max_tokens)
            .await
    }
}

fn parse_keywords(response: &str) -> Vec<String> {
    let response = response.trim();
    let response = response
        .strip_prefix("Keywords:")
        .map_or(response, str::trim);

    response
        .split(',')
        .map(str::trim)
        .filter(|keyword| keyword.chars().count() > MIN_KEYWORD_LENGTH)
        .take(MAX_KEYWORDS)
        .map(str::to_owned)
        .collect()
}
