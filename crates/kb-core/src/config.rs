//! Configuration for provider endpoints, embedding, search and generation.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Error, Result};

/// Complete assistant configuration.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KbConfig {
    /// Ollama endpoint shared by embedding and generation
    pub ollama: OllamaConfig,
    /// Qdrant endpoint
    pub qdrant: QdrantConfig,
    /// Embedding and chunking settings
    pub embedding: EmbeddingConfig,
    /// Search settings
    pub search: SearchConfig,
    /// Answer generation settings
    pub generation: GenerationConfig,
}

/// Ollama endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Base URL including scheme and port
    pub url: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_owned(),
        }
    }
}

/// Qdrant endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QdrantConfig {
    /// Base URL of the REST API
    pub url: String,
    /// Optional API key sent as `api-key`
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_owned(),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

impl QdrantConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Embedding and chunking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding model name
    pub model: String,
    /// Vector length produced by the model
    pub dimension: usize,
    /// Texts are truncated to this many characters before embedding
    pub max_content_length: usize,
    /// Default chunk size in characters
    pub chunk_size: usize,
    /// Default overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "all-minilm".to_owned(),
            dimension: 384,
            max_content_length: 8000,
            chunk_size: 512,
            chunk_overlap: 50,
            timeout_seconds: 30,
        }
    }
}

impl EmbeddingConfig {
    /// Per-call timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Vector index collection name
    pub collection: String,
    /// Minimum score for article search hits
    pub min_score: f32,
    /// Upper bound on the page size
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            collection: "kb_articles".to_owned(),
            min_score: 0.1,
            max_results: 50,
        }
    }
}

/// Answer generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Generation model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Context block is cut to this many characters
    pub max_context_length: usize,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "llama2:7b".to_owned(),
            temperature: 0.7,
            max_tokens: 500,
            max_context_length: 4000,
            timeout_seconds: 60,
        }
    }
}

impl GenerationConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl KbConfig {
    /// Get the default config directory path (`~/.kb-assistant`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".kb-assistant"))
    }

    /// Get the default config file path (`~/.kb-assistant/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, creating it with defaults when missing
    ///
    /// # Errors
    /// Returns an error if the config cannot be read, parsed or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or fails validation
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        tracing::debug!(
            "Loaded config from {}: embedding_model={}, llm_model={}, qdrant_api_key={}",
            path.display(),
            config.embedding.model,
            config.generation.model,
            if config.qdrant.api_key.is_some() {
                "present"
            } else {
                "missing"
            }
        );

        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# Knowledge-base assistant configuration\n\
                      # This file is automatically generated on first run\n\n";

        fs::write(path, format!("{header}{contents}"))?;
        Ok(())
    }

    /// Override endpoints and model names from the environment.
    #[must_use]
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("OLLAMA_URL") {
            self.ollama.url = url;
        }
        if let Ok(url) = env::var("QDRANT_URL") {
            self.qdrant.url = url;
        }
        if let Ok(key) = env::var("QDRANT_API_KEY") {
            self.qdrant.api_key = Some(key);
        }
        if let Ok(model) = env::var("EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Ok(model) = env::var("LLM_MODEL") {
            self.generation.model = model;
        }
        self
    }

    /// Reject values the pipeline cannot work with.
    ///
    /// # Errors
    /// Returns a configuration error naming the offending field
    pub fn validate(&self) -> Result<()> {
        if self.embedding.chunk_size == 0 {
            return Err(Error::Config("embedding.chunk_size must be positive".to_owned()));
        }
        if self.embedding.dimension == 0 {
            return Err(Error::Config("embedding.dimension must be positive".to_owned()));
        }
        if !(0.0..=1.0).contains(&self.search.min_score) {
            return Err(Error::Config(format!(
                "search.min_score must be within [0, 1], got {}",
                self.search.min_score
            )));
        }
        if self.search.max_results == 0 {
            return Err(Error::Config("search.max_results must be positive".to_owned()));
        }
        Ok(())
    }
}
