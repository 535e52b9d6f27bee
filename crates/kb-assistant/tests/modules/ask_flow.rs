//! Retrieve-then-answer over fake providers and the in-memory index.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kb_assistant::{
        AnswerService, FALLBACK_ANSWER, KnowledgeAssistant, NO_ARTICLES_SUGGESTION,
        ScriptedGenerator,
    };
    use kb_core::{Error, GenerationConfig, IndexedArticle, KbConfig, Payload};
    use kb_retrieval::{FakeEmbeddingClient, InMemoryVectorIndex, RetrievalOrchestrator};
    use serde_json::{Value, json};

    const DIMENSION: usize = 256;

    fn orchestrator(embedder: FakeEmbeddingClient) -> Arc<RetrievalOrchestrator> {
        let mut config = KbConfig::default();
        config.embedding.dimension = DIMENSION;
        let index = Arc::new(InMemoryVectorIndex::new(DIMENSION));
        Arc::new(RetrievalOrchestrator::new(Arc::new(embedder), index, &config).unwrap())
    }

    fn assistant(
        retrieval: Arc<RetrievalOrchestrator>,
        generator: ScriptedGenerator,
    ) -> (Arc<ScriptedGenerator>, KnowledgeAssistant) {
        let generator = Arc::new(generator);
        let answers = AnswerService::new(Arc::clone(&generator) as _, GenerationConfig::default());
        (generator, KnowledgeAssistant::new(retrieval, answers))
    }

    fn metadata() -> Payload {
        let Value::Object(map) = json!({
            "tenant_id": "T1",
            "project_id": "P1",
            "status": "published",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }) else {
            panic!("expected object");
        };
        map
    }

    async fn seed(retrieval: &RetrievalOrchestrator) {
        retrieval
            .index_article(&IndexedArticle {
                id: "reset".to_owned(),
                title: "Reset password".to_owned(),
                content: "To reset your password open Settings then Security.".to_owned(),
                metadata: metadata(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn no_articles_short_circuits_generation() {
        let retrieval = orchestrator(FakeEmbeddingClient::new(DIMENSION));
        let (generator, assistant) = assistant(retrieval, ScriptedGenerator::replying("unused"));

        let answer = assistant
            .ask("How do I reset my password?", "T1", "P1", 3)
            .await
            .unwrap();

        assert!(!answer.has_answer);
        assert_eq!(answer.confidence, 0.0);
        assert_eq!(answer.suggestions, vec![NO_ARTICLES_SUGGESTION]);
        assert!(answer.sources.is_empty());
        assert!(generator.calls().await.is_empty());
    }

    #[tokio::test]
    async fn answer_is_grounded_in_retrieved_articles() {
        let retrieval = orchestrator(FakeEmbeddingClient::new(DIMENSION));
        seed(&retrieval).await;
        let (generator, assistant) = assistant(
            retrieval,
            ScriptedGenerator::replying(
                "Open Settings, choose Security and then press the Reset password button.",
            ),
        );

        let answer = assistant
            .ask("How do I reset my password?", "T1", "P1", 3)
            .await
            .unwrap();

        assert!(answer.has_answer);
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].id, "reset");
        assert_eq!(answer.reasoning, "Based on 1 knowledge base articles");

        let calls = generator.calls().await;
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("1. Reset password\n"));
    }

    #[tokio::test]
    async fn generation_failure_keeps_sources() {
        let retrieval = orchestrator(FakeEmbeddingClient::new(DIMENSION));
        seed(&retrieval).await;
        let (_generator, assistant) = assistant(retrieval, ScriptedGenerator::failing());

        let answer = assistant
            .ask("How do I reset my password?", "T1", "P1", 3)
            .await
            .unwrap();

        assert_eq!(answer.answer_text, FALLBACK_ANSWER);
        assert_eq!(answer.confidence, 0.0);
        assert!(!answer.has_answer);
        assert_eq!(answer.sources.len(), 1);
    }

    #[tokio::test]
    async fn retrieval_failure_propagates() {
        let retrieval = orchestrator(FakeEmbeddingClient::failing(DIMENSION));
        let (generator, assistant) = assistant(retrieval, ScriptedGenerator::replying("unused"));

        let result = assistant.ask("Anything?", "T1", "P1", 3).await;
        assert!(matches!(result, Err(Error::EmbeddingUnavailable(_))));
        assert!(generator.calls().await.is_empty());
    }

    #[tokio::test]
    async fn authoring_helpers_use_the_generator() {
        let retrieval = orchestrator(FakeEmbeddingClient::new(DIMENSION));
        let (_generator, assistant) = assistant(
            retrieval,
            ScriptedGenerator::replying("Keywords: password reset, security, settings"),
        );

        let keywords = assistant.answers().suggest_keywords("Reset", "Body").await;
        assert_eq!(keywords, vec!["password reset", "security", "settings"]);
    }
}
