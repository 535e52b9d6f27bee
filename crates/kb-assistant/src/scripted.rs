//! Scripted generation provider for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use kb_core::{Error, GenerationProvider, Result};
use tokio::sync::Mutex;

/// One recorded `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateCall {
    /// Prompt sent
    pub prompt: String,
    /// Temperature requested
    pub temperature: f32,
    /// Token limit requested
    pub max_tokens: u32,
}

/// Replays queued responses in order; fails once the queue is empty.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<GenerateCall>>,
    shut_down: AtomicBool,
}

impl ScriptedGenerator {
    /// Queue the given outcomes.
    pub fn new(responses: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::default(),
            shut_down: AtomicBool::new(false),
        }
    }

    /// A generator that always answers with `text`.
    pub fn replying(text: &str) -> Self {
        Self::new([Ok(text.to_owned())])
    }

    /// A generator whose first call fails.
    pub fn failing() -> Self {
        Self::new([Err(Error::GenerationFailure("scripted failure".to_owned()))])
    }

    /// Calls received so far.
    pub async fn calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().await.clone()
    }

    /// Whether `shutdown` has been called.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn initialize(&self) {
        self.shut_down.store(false, Ordering::SeqCst);
    }

    async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }

    async fn generate(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        self.calls.lock().await.push(GenerateCall {
            prompt: prompt.to_owned(),
            temperature,
            max_tokens,
        });
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(Error::GenerationFailure("no scripted response left".to_owned())))
    }
}
