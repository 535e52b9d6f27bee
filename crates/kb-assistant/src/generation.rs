//! Text generation through the Ollama REST API.

use async_trait::async_trait;
use kb_core::{Error, GenerationConfig, GenerationProvider, OllamaConfig, Result};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::models::{
    GenerateOptions, OllamaGenerateRequest, OllamaGenerateResponse, OllamaListResponse,
    OllamaPullRequest,
};

/// Generation provider backed by a local Ollama server.
pub struct OllamaGenerationClient {
    client: Client,
    base_url: String,
    model_name: String,
}

impl OllamaGenerationClient {
    /// Create a client for the configured endpoint and model.
    ///
    /// # Errors
    /// Returns `GenerationFailure` if the HTTP client cannot be built
    pub fn new(ollama: &OllamaConfig, generation: &GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(generation.timeout())
            .build()
            .map_err(|err| Error::GenerationFailure(format!("Failed to build Ollama client: {err}")))?;

        Ok(Self {
            client,
            base_url: ollama.url.trim_end_matches('/').to_owned(),
            model_name: generation.model.clone(),
        })
    }

    /// Model used for generation.
    pub fn model(&self) -> &str {
        &self.model_name
    }

    async fn ensure_model_loaded(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|err| Error::GenerationFailure(format!("Ollama request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(Error::GenerationFailure(format!(
                "Ollama returned error: {}",
                response.status()
            )));
        }

        let tags: OllamaListResponse = response
            .json()
            .await
            .map_err(|err| Error::GenerationFailure(format!("Failed to parse Ollama tags: {err}")))?;

        if tags.models.iter().any(|model| model.name == self.model_name) {
            return Ok(());
        }

        warn!("Model {} not found. Attempting to pull...", self.model_name);
        let response = self
            .client
            .post(format!("{}/api/pull", self.base_url))
            .json(&OllamaPullRequest {
                name: &self.model_name,
                stream: false,
            })
            .send()
            .await
            .map_err(|err| Error::GenerationFailure(format!("Ollama pull failed: {err}")))?;

        if !response.status().is_success() {
            return Err(Error::GenerationFailure(format!(
                "Ollama pull returned error: {}",
                response.status()
            )));
        }
        info!("Successfully pulled model: {}", self.model_name);
        Ok(())
    }
}

#[async_trait]
impl GenerationProvider for OllamaGenerationClient {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn initialize(&self) {
        match self.ensure_model_loaded().await {
            Ok(()) => info!("Generation model {} ready", self.model_name),
            Err(err) => warn!("Failed to check/load model {}: {err}", self.model_name),
        }
    }

    async fn shutdown(&self) {
        debug!("Generation client for {} released", self.model_name);
    }

    async fn generate(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: &self.model_name,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature,
                num_predict: max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|err| Error::GenerationFailure(format!("Ollama request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::GenerationFailure(format!(
                "Ollama returned error {status}: {error_text}"
            )));
        }

        let ollama_response: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|err| Error::GenerationFailure(format!("Failed to parse Ollama response: {err}")))?;

        Ok(ollama_response.response)
    }
}
