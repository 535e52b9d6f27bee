//! Heuristic answer confidence and the answer/suggestion gate.

use kb_core::{Answer, RetrievedArticle};

/// Phrases that signal an unsure response; matched as lowercase substrings.
const UNCERTAINTY_PHRASES: [&str; 4] = ["i don't know", "not sure", "unclear", "might be"];

/// Confidence assigned before any adjustment.
const BASE_CONFIDENCE: f32 = 0.5;
/// Bonus per length tier crossed.
const LENGTH_BONUS: f32 = 0.1;
/// Weight of the mean source score.
const SOURCE_WEIGHT: f32 = 0.3;
/// Penalty when an uncertainty phrase is present.
const UNCERTAINTY_PENALTY: f32 = 0.2;

/// An answer is surfaced only above this confidence.
pub const ANSWER_CONFIDENCE_THRESHOLD: f32 = 0.3;
/// An answer is surfaced only when longer than this many characters.
pub const MIN_ANSWER_LENGTH: usize = 10;
/// Source titles offered as suggestions when no answer is surfaced.
pub const MAX_SUGGESTIONS: usize = 3;

/// Scores generated answers and decides whether to surface them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerConfidenceScorer;

impl AnswerConfidenceScorer {
    /// Confidence in `[0, 1]` for a generated response backed by `sources`.
    pub fn score(response: &str, sources: &[RetrievedArticle]) -> f32 {
        let mut confidence = BASE_CONFIDENCE;

        let length = response.chars().count();
        if length > 50 {
            confidence += LENGTH_BONUS;
        }
        if length > 100 {
            confidence += LENGTH_BONUS;
        }

        if !sources.is_empty() {
            let total: f32 = sources.iter().map(|source| source.score).sum();
            confidence += total / sources.len() as f32 * SOURCE_WEIGHT;
        }

        let lowered = response.to_lowercase();
        if UNCERTAINTY_PHRASES
            .iter()
            .any(|phrase| lowered.contains(phrase))
        {
            confidence -= UNCERTAINTY_PENALTY;
        }

        confidence.clamp(0.0, 1.0)
    }

    /// Assemble the structured answer for a generated response.
    pub fn build_answer(question: &str, response: &str, sources: Vec<RetrievedArticle>) -> Answer {
        let confidence = Self::score(response, &sources);
        let answer_text = response.trim().to_owned();
        let has_answer =
            confidence > ANSWER_CONFIDENCE_THRESHOLD && answer_text.chars().count() > MIN_ANSWER_LENGTH;

        let suggestions = if has_answer {
            Vec::default()
        } else {
            sources
                .iter()
                .take(MAX_SUGGESTIONS)
                .map(|source| source.title.clone())
                .collect()
        };

        Answer {
            question: question.to_owned(),
            answer_text,
            confidence,
            reasoning: format!("Based on {} knowledge base articles", sources.len()),
            sources,
            has_answer,
            suggestions,
        }
    }
}
