//! Deterministic, hash-based embedding provider for tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash as _, Hasher as _};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use kb_core::{Embedding, EmbeddingProvider, Error, Result};

/// Bag-of-words embeddings: each lowercase word hashes into one bucket, and
/// the vector is L2-normalised. Texts sharing words score higher.
pub struct FakeEmbeddingClient {
    dimension: usize,
    ready: AtomicBool,
    failing: bool,
    calls: AtomicUsize,
}

impl FakeEmbeddingClient {
    /// A ready provider producing vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ready: AtomicBool::new(true),
            failing: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider whose every embed call fails with `EmbeddingUnavailable`.
    pub fn failing(dimension: usize) -> Self {
        Self {
            failing: true,
            ..Self::new(dimension)
        }
    }

    /// Number of `embed`/`embed_batch` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Embed synchronously, bypassing lifecycle and call counting.
    pub fn fake_embedding(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0_f32; self.dimension];
        if self.dimension == 0 {
            return vector;
        }

        for word in text
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| !word.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }

    fn check(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(Error::EmbeddingUnavailable("fake provider failure".to_owned()));
        }
        if !self.ready.load(Ordering::SeqCst) {
            return Err(Error::EmbeddingUnavailable("fake provider shut down".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddingClient {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn initialize(&self) -> Result<()> {
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn shutdown(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.check()?;
        Ok(self.fake_embedding(text))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        self.check()?;
        Ok(texts.iter().map(|text| self.fake_embedding(text)).collect())
    }
}
