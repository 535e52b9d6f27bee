//! Ollama REST request and response bodies.

use serde::{Deserialize, Serialize};

/// Ollama generate request
#[derive(Debug, Serialize)]
pub struct OllamaGenerateRequest<'req> {
    /// Model name
    pub model: &'req str,
    /// Prompt text
    pub prompt: &'req str,
    /// Whether to stream the response
    pub stream: bool,
    /// Sampling options
    pub options: GenerateOptions,
}

/// Sampling options for a generate call
#[derive(Debug, Serialize)]
pub struct GenerateOptions {
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub num_predict: u32,
}

/// Ollama generate response
#[derive(Debug, Deserialize)]
pub struct OllamaGenerateResponse {
    /// Generated text
    #[serde(default)]
    pub response: String,
}

/// Response from Ollama list models API
#[derive(Debug, Deserialize)]
pub struct OllamaListResponse {
    /// Locally available models
    #[serde(default)]
    pub models: Vec<OllamaModel>,
}

/// One locally available model
#[derive(Debug, Deserialize)]
pub struct OllamaModel {
    /// Model name including tag
    pub name: String,
}

/// Ollama pull request
#[derive(Debug, Serialize)]
pub struct OllamaPullRequest<'req> {
    /// Model name
    pub name: &'req str,
    /// Whether to stream progress
    pub stream: bool,
}
