//! Qdrant REST adapter against a mock server.

#[cfg(test)]
mod tests {
    use kb_core::{
        Error, FieldCondition, Payload, QdrantConfig, SearchFilter, VectorIndex as _, VectorQuery,
    };
    use kb_retrieval::QdrantIndex;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn index_for(server: &MockServer, api_key: Option<&str>) -> QdrantIndex {
        let config = QdrantConfig {
            url: server.uri(),
            api_key: api_key.map(str::to_owned),
            timeout_seconds: 5,
        };
        QdrantIndex::new(&config, "kb", 4).unwrap()
    }

    fn ok_body() -> Value {
        json!({"result": true, "status": "ok", "time": 0.001})
    }

    #[tokio::test]
    async fn initialize_creates_missing_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections/kb"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/collections/kb"))
            .and(body_json(json!({"vectors": {"size": 4, "distance": "Cosine"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        index_for(&server, None).initialize().await.unwrap();
    }

    #[tokio::test]
    async fn initialize_keeps_existing_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections/kb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/collections/kb"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        index_for(&server, None).initialize().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_sends_point_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/collections/kb/points"))
            .and(query_param("wait", "true"))
            .and(header("api-key", "secret"))
            .and(body_json(json!({
                "points": [{"id": 42, "vector": [0.5, 0.25, 0.0, 1.0], "payload": {"title": "T"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let mut payload = Payload::default();
        payload.insert("title".to_owned(), json!("T"));
        index_for(&server, Some("secret"))
            .upsert("42", vec![0.5, 0.25, 0.0, 1.0], payload)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn upsert_rejects_wrong_dimension_without_request() {
        let server = MockServer::start().await;
        let result = index_for(&server, None)
            .upsert("1", vec![1.0], Payload::default())
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn delete_posts_point_selector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/collections/kb/points/delete"))
            .and(body_json(json!({"points": ["7c9e6679-7425-40de-944b-e07fc1f90ae7"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        index_for(&server, None)
            .delete("7c9e6679-7425-40de-944b-e07fc1f90ae7")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn search_sends_filter_and_parses_hits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/collections/kb/points/search"))
            .and(body_partial_json(json!({
                "limit": 5,
                "offset": 2,
                "with_payload": true,
                "filter": {"must": [{"key": "tenant_id", "match": {"value": "T1"}}]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [
                    {"id": "abc", "score": 0.9, "payload": {"title": "First"}},
                    {"id": 7, "score": 0.5, "payload": null}
                ],
                "status": "ok",
                "time": 0.002
            })))
            .expect(1)
            .mount(&server)
            .await;

        let hits = index_for(&server, None)
            .search(VectorQuery {
                vector: vec![0.1, 0.2, 0.3, 0.4],
                filter: SearchFilter::default().with(FieldCondition::equals("tenant_id", "T1")),
                limit: 5,
                offset: 2,
                score_threshold: Some(0.1),
            })
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "abc");
        assert_eq!(hits[0].payload.get("title"), Some(&json!("First")));
        assert_eq!(hits[1].id, "7");
        assert!(hits[1].payload.is_empty());
    }

    #[tokio::test]
    async fn server_errors_are_retrieval_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/collections/kb/points/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = index_for(&server, None)
            .search(VectorQuery {
                vector: vec![0.0; 4],
                filter: SearchFilter::default(),
                limit: 1,
                offset: 0,
                score_threshold: None,
            })
            .await;

        let message = match result {
            Err(Error::RetrievalFailure(message)) => message,
            other => panic!("expected retrieval failure, got {other:?}"),
        };
        assert!(message.contains("500"));
        assert!(Error::RetrievalFailure(message).is_retryable());
    }

    #[tokio::test]
    async fn unreachable_server_fails_initialize() {
        let config = QdrantConfig {
            url: "http://127.0.0.1:1".to_owned(),
            api_key: None,
            timeout_seconds: 2,
        };
        let index = QdrantIndex::new(&config, "kb", 4).unwrap();
        let result = index.initialize().await;
        assert!(matches!(result, Err(Error::RetrievalFailure(_))));
    }
}
