//! Ollama generation client against a mock server.

#[cfg(test)]
mod tests {
    use kb_assistant::OllamaGenerationClient;
    use kb_core::{Error, GenerationConfig, GenerationProvider as _, OllamaConfig};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OllamaGenerationClient {
        let ollama = OllamaConfig { url: server.uri() };
        let generation = GenerationConfig {
            timeout_seconds: 5,
            ..GenerationConfig::default()
        };
        OllamaGenerationClient::new(&ollama, &generation).unwrap()
    }

    #[tokio::test]
    async fn generate_sends_sampling_options() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(json!({
                "model": "llama2:7b",
                "prompt": "Say hi",
                "stream": false,
                "options": {"temperature": 0.5, "num_predict": 64}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama2:7b",
                "response": "Hi there!",
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).generate("Say hi", 0.5, 64).await.unwrap();
        assert_eq!(text, "Hi there!");
    }

    #[tokio::test]
    async fn error_status_is_generation_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
            .mount(&server)
            .await;

        let result = client_for(&server).generate("Say hi", 0.7, 500).await;
        match result {
            Err(Error::GenerationFailure(message)) => assert!(message.contains("model crashed")),
            other => panic!("expected generation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_generation_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).generate("Say hi", 0.7, 500).await;
        assert!(matches!(result, Err(Error::GenerationFailure(_))));
    }

    #[tokio::test]
    async fn initialize_pulls_missing_model() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"models": [{"name": "all-minilm:latest"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/pull"))
            .and(body_json(json!({"name": "llama2:7b", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).initialize().await;
    }

    #[tokio::test]
    async fn initialize_skips_pull_for_present_model() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"models": [{"name": "llama2:7b"}]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/pull"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        client_for(&server).initialize().await;
    }

    #[tokio::test]
    async fn initialize_tolerates_unreachable_server() {
        let ollama = OllamaConfig {
            url: "http://127.0.0.1:1".to_owned(),
        };
        let generation = GenerationConfig {
            timeout_seconds: 2,
            ..GenerationConfig::default()
        };
        let client = OllamaGenerationClient::new(&ollama, &generation).unwrap();
        client.initialize().await;
    }
}
