//! Qdrant REST adapter.

use async_trait::async_trait;
use kb_core::{
    Embedding, Error, Payload, QdrantConfig, Result, ScoredPoint, SearchFilter, VectorIndex,
    VectorQuery,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

/// Header carrying the Qdrant API key.
const API_KEY_HEADER: &str = "api-key";

/// Vector index backed by a Qdrant collection.
pub struct QdrantIndex {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    collection: String,
    dimension: usize,
}

#[derive(Serialize)]
struct SearchRequest<'req> {
    vector: &'req [f32],
    filter: &'req SearchFilter,
    limit: usize,
    offset: usize,
    with_payload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    score_threshold: Option<f32>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    id: Value,
    score: f32,
    #[serde(default)]
    payload: Option<Payload>,
}

impl QdrantIndex {
    /// Create an adapter for `collection` holding vectors of `dimension` components.
    ///
    /// # Errors
    /// Returns `RetrievalFailure` if the HTTP client cannot be built
    pub fn new(config: &QdrantConfig, collection: impl Into<String>, dimension: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| Error::RetrievalFailure(format!("Failed to build Qdrant client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            collection: collection.into(),
            dimension,
        })
    }

    /// Collection this adapter writes to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| Error::RetrievalFailure(format!("Qdrant {operation} request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::RetrievalFailure(format!(
                "Qdrant {operation} error {status}: {error_text}"
            )));
        }
        Ok(response)
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
impl VectorIndex for QdrantIndex {
    async fn initialize(&self) -> Result<()> {
        let url = self.collection_url();
        let existing = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|err| Error::RetrievalFailure(format!("Failed to reach Qdrant: {err}")))?;

        match existing.status() {
            status if status.is_success() => {
                debug!("Qdrant collection '{}' already exists", self.collection);
                return Ok(());
            }
            StatusCode::NOT_FOUND => {}
            status => {
                return Err(Error::RetrievalFailure(format!(
                    "Qdrant collection lookup error {status}"
                )));
            }
        }

        let body = json!({
            "vectors": {"size": self.dimension, "distance": "Cosine"}
        });
        self.send("create collection", self.client.put(&url).json(&body))
            .await?;
        info!(
            "Created Qdrant collection '{}' (dimension {})",
            self.collection, self.dimension
        );
        Ok(())
    }

    async fn shutdown(&self) {
        debug!("Released Qdrant collection '{}'", self.collection);
    }

    async fn upsert(&self, id: &str, vector: Embedding, payload: Payload) -> Result<()> {
        self.check_dimension(&vector)?;
        let body = json!({
            "points": [{"id": point_id(id), "vector": vector, "payload": payload}]
        });
        let url = format!("{}/points?wait=true", self.collection_url());
        self.send("upsert", self.client.put(url).json(&body)).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let body = json!({"points": [point_id(id)]});
        let url = format!("{}/points/delete?wait=true", self.collection_url());
        self.send("delete", self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn search(&self, query: VectorQuery) -> Result<Vec<ScoredPoint>> {
        self.check_dimension(&query.vector)?;
        let body = SearchRequest {
            vector: &query.vector,
            filter: &query.filter,
            limit: query.limit,
            offset: query.offset,
            with_payload: true,
            score_threshold: query.score_threshold,
        };
        let url = format!("{}/points/search", self.collection_url());
        let response = self.send("search", self.client.post(url).json(&body)).await?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|err| Error::RetrievalFailure(format!("Malformed Qdrant search response: {err}")))?;

        parsed
            .result
            .into_iter()
            .map(|hit| {
                Ok(ScoredPoint {
                    id: id_to_string(hit.id)?,
                    score: hit.score,
                    payload: hit.payload.unwrap_or_default(),
                })
            })
            .collect()
    }
}

/// Qdrant point ids are unsigned integers or UUID strings.
fn point_id(id: &str) -> Value {
    id.parse::<u64>().map_or_else(|_| Value::from(id), Value::from)
}

fn id_to_string(id: Value) -> Result<String> {
    match id {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(Error::RetrievalFailure(format!("Unexpected point id: {other}"))),
    }
}
