//! In-process vector index with exact cosine scoring.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use kb_core::{Embedding, Error, IgnoreLock as _, Payload, Result, ScoredPoint, VectorIndex, VectorQuery};

use crate::similarity::cosine_similarity;

/// Stored vector and payload.
#[derive(Debug, Clone)]
struct StoredPoint {
    vector: Embedding,
    payload: Payload,
}

/// In-memory vector index for tests and single-process use.
pub struct InMemoryVectorIndex {
    dimension: usize,
    points: RwLock<HashMap<String, StoredPoint>>,
}

impl InMemoryVectorIndex {
    /// Create an empty index accepting vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            points: RwLock::new(HashMap::default()),
        }
    }

    /// Get number of stored points
    pub fn len(&self) -> usize {
        self.points.read_ignore_poison().len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.points.read_ignore_poison().is_empty()
    }

    /// Payload stored for `id`.
    pub fn payload(&self, id: &str) -> Option<Payload> {
        self.points
            .read_ignore_poison()
            .get(id)
            .map(|point| point.payload.clone())
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() == self.dimension {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "expected vector of dimension {}, got {}",
                self.dimension,
                vector.len()
            )))
        }
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Drops every stored point.
    async fn shutdown(&self) {
        self.points.write_ignore_poison().clear();
    }

    async fn upsert(&self, id: &str, vector: Embedding, payload: Payload) -> Result<()> {
        self.check_dimension(&vector)?;
        self.points
            .write_ignore_poison()
            .insert(id.to_owned(), StoredPoint { vector, payload });
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.points.write_ignore_poison().remove(id);
        Ok(())
    }

    async fn search(&self, query: VectorQuery) -> Result<Vec<ScoredPoint>> {
        self.check_dimension(&query.vector)?;

        let points = self.points.read_ignore_poison();
        let mut hits = Vec::with_capacity(points.len());
        for (id, point) in points.iter() {
            if !query.filter.matches(&point.payload) {
                continue;
            }
            let score = cosine_similarity(&query.vector, &point.vector)?;
            if query.score_threshold.is_some_and(|threshold| score < threshold) {
                continue;
            }
            hits.push(ScoredPoint {
                id: id.clone(),
                score,
                payload: point.payload.clone(),
            });
        }
        drop(points);

        hits.sort_by(|first, second| {
            second
                .score
                .partial_cmp(&first.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| first.id.cmp(&second.id))
        });

        Ok(hits
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }
}
