//! Embedding generation through a local Ollama server.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kb_core::{Embedding, EmbeddingConfig, EmbeddingProvider, Error, OllamaConfig, Result};
use ollama_rs::Ollama;
use ollama_rs::generation::embeddings::request::GenerateEmbeddingsRequest;
use tracing::{debug, info};

/// Port Ollama listens on when the URL does not name one.
const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// Ollama embedding client.
pub struct OllamaEmbeddingClient {
    ollama: Ollama,
    model: String,
    timeout: Duration,
    ready: AtomicBool,
}

impl OllamaEmbeddingClient {
    /// Create a client for the configured endpoint and model.
    ///
    /// The client refuses to embed until [`EmbeddingProvider::initialize`] succeeds.
    ///
    /// # Errors
    /// Returns `Config` if the Ollama URL cannot be parsed
    pub fn new(ollama: &OllamaConfig, embedding: &EmbeddingConfig) -> Result<Self> {
        let (host, port) = split_host_port(&ollama.url);
        let client = Ollama::try_new(format!("{host}:{port}")).map_err(|error| {
            Error::Config(format!("invalid ollama.url '{}': {error}", ollama.url))
        })?;
        Ok(Self {
            ollama: client,
            model: embedding.model.clone(),
            timeout: embedding.timeout(),
            ready: AtomicBool::new(false),
        })
    }

    /// Model used for embeddings.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.ready.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(Error::EmbeddingUnavailable(format!(
                "embedding model '{}' is not initialized",
                self.model
            )))
        }
    }

    /// Run an Ollama call under the configured timeout.
    async fn with_timeout<T, E, F>(&self, operation: &str, future: F) -> Result<T>
    where
        E: std::fmt::Display,
        F: Future<Output = core::result::Result<T, E>> + Send,
    {
        match tokio::time::timeout(self.timeout, future).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(self.describe_failure(operation, &error.to_string())),
            Err(_) => Err(Error::EmbeddingUnavailable(format!(
                "{operation} timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    fn describe_failure(&self, operation: &str, message: &str) -> Error {
        if message.contains("model") && message.contains("not found") {
            Error::EmbeddingUnavailable(format!(
                "Embedding model '{}' not found. Run: ollama pull {}",
                self.model, self.model
            ))
        } else {
            Error::EmbeddingUnavailable(format!("{operation} failed: {message}"))
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn initialize(&self) -> Result<()> {
        let models = self
            .with_timeout("Listing Ollama models", self.ollama.list_local_models())
            .await
            .map_err(|error| {
                Error::EmbeddingUnavailable(format!(
                    "Failed to connect to Ollama: {error}. Ensure Ollama is installed and running (ollama serve)"
                ))
            })?;

        let model_available = models.iter().any(|model| model.name.contains(&self.model));
        if !model_available {
            info!("Embedding model '{}' not found, pulling", self.model);
            self.with_timeout(
                "Pulling embedding model",
                self.ollama.pull_model(self.model.clone(), false),
            )
            .await?;
            info!("Pulled embedding model '{}'", self.model);
        }

        self.ready.store(true, Ordering::Release);
        info!("Embedding model '{}' ready", self.model);
        Ok(())
    }

    async fn shutdown(&self) {
        self.ready.store(false, Ordering::Release);
        debug!("Embedding model '{}' released", self.model);
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.ensure_ready()?;
        let request = GenerateEmbeddingsRequest::new(self.model.clone(), text.to_owned().into());
        let response = self
            .with_timeout("Embedding generation", self.ollama.generate_embeddings(request))
            .await?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmbeddingUnavailable("No embeddings returned".to_owned()))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        self.ensure_ready()?;
        if texts.is_empty() {
            return Ok(Vec::default());
        }

        let expected = texts.len();
        let request = GenerateEmbeddingsRequest::new(self.model.clone(), texts.into());
        let response = self
            .with_timeout(
                "Batch embedding generation",
                self.ollama.generate_embeddings(request),
            )
            .await?;

        if response.embeddings.len() != expected {
            return Err(Error::EmbeddingUnavailable(format!(
                "Ollama returned {} embeddings for {expected} texts",
                response.embeddings.len()
            )));
        }
        Ok(response.embeddings)
    }
}

/// Split `scheme://host:port/` into the host part and port Ollama expects.
fn split_host_port(url: &str) -> (String, u16) {
    let trimmed = url.trim().trim_end_matches('/');
    let authority_start = trimmed.find("://").map_or(0, |index| index + 3);

    if let Some(colon) = trimmed[authority_start..].rfind(':') {
        let colon = authority_start + colon;
        if let Ok(port) = trimmed[colon + 1..].parse::<u16>() {
            return (trimmed[..colon].to_owned(), port);
        }
    }
    (trimmed.to_owned(), DEFAULT_OLLAMA_PORT)
}
