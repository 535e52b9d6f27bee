//! Property tests for the confidence heuristic.

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use kb_assistant::AnswerConfidenceScorer;
    use kb_core::RetrievedArticle;
    use proptest::collection::vec;
    use proptest::prelude::*;

    fn sources(scores: &[f32]) -> Vec<RetrievedArticle> {
        let now = Utc::now();
        scores
            .iter()
            .enumerate()
            .map(|(index, &score)| RetrievedArticle {
                id: index.to_string(),
                title: format!("Article {index}"),
                content: String::new(),
                summary: None,
                score,
                rank: index + 1,
                snippet: String::new(),
                tags: Vec::default(),
                keywords: Vec::default(),
                category_name: None,
                author_name: None,
                view_count: 0,
                helpful_count: 0,
                created_at: now,
                updated_at: now,
                published_at: None,
            })
            .collect()
    }

    proptest! {
        #[test]
        fn longer_responses_never_lose_confidence(scores in vec(0.0_f32..1.0, 0..5)) {
            let sources = sources(&scores);
            let short = AnswerConfidenceScorer::score(&"x".repeat(40), &sources);
            let medium = AnswerConfidenceScorer::score(&"x".repeat(60), &sources);
            let long = AnswerConfidenceScorer::score(&"x".repeat(110), &sources);

            prop_assert!(short <= medium);
            prop_assert!(medium <= long);
        }

        #[test]
        fn uncertainty_costs_point_two(
            prefix in "[x ]{0,120}",
            scores in vec(0.0_f32..1.0, 0..5),
        ) {
            let sources = sources(&scores);
            let plain = AnswerConfidenceScorer::score(&format!("{prefix}xxxxxxx"), &sources);
            let unsure = AnswerConfidenceScorer::score(&format!("{prefix}unclear"), &sources);

            prop_assert!(unsure < plain || plain == 0.0);
            prop_assert!((plain - unsure - 0.2).abs() < 1e-5 || unsure == 0.0);
            prop_assert!((0.0..=1.0).contains(&unsure));
        }

        #[test]
        fn has_answer_requires_confidence_and_length(
            response in "\\PC{0,150}",
            scores in vec(0.0_f32..1.0, 0..5),
        ) {
            let answer = AnswerConfidenceScorer::build_answer("q", &response, sources(&scores));
            if answer.has_answer {
                prop_assert!(answer.confidence > 0.3);
                prop_assert!(answer.answer_text.chars().count() > 10);
                prop_assert!(answer.suggestions.is_empty());
            } else {
                prop_assert!(answer.suggestions.len() <= 3);
            }
        }
    }
}
