//! Query-time retrieval and index maintenance over the embedding provider and
//! the vector index.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use kb_core::{
    EmbeddingConfig, EmbeddingProvider, Error, IndexedArticle, KbConfig, Payload, Result,
    RetrievedArticle, ScoredPoint, SearchConfig, SearchOptions, SearchPage, SimilarityResult,
    VectorIndex, VectorQuery,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::chunking::{TextChunker, normalize_for_embedding};
use crate::filter::FilterBuilder;
use crate::snippet::{DEFAULT_SNIPPET_LENGTH, extract_snippet};

/// Page size used when a search does not set one.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Payload key linking a chunk point to its article.
const ARTICLE_ID_KEY: &str = "article_id";
/// Payload key holding a chunk's ordinal position.
const CHUNK_INDEX_KEY: &str = "chunk_index";

/// Parameters of an article search.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleSearch {
    /// Free-text query
    pub query: String,
    /// Tenant the results must belong to
    pub tenant_id: String,
    /// Project the results must belong to
    pub project_id: String,
    /// Page size
    pub limit: usize,
    /// Number of leading hits to skip
    pub offset: usize,
    /// Extra constraints
    pub options: Option<SearchOptions>,
}

impl ArticleSearch {
    /// Search for `query` within a tenant and project, first page.
    pub fn new(
        query: impl Into<String>,
        tenant_id: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            tenant_id: tenant_id.into(),
            project_id: project_id.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
            options: None,
        }
    }

    /// Set the page size.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the number of hits to skip.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Add visibility, status and tag constraints.
    #[must_use]
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Stored article fields read back from a hit.
#[derive(Deserialize)]
struct ArticlePayload {
    #[serde(default)]
    article_id: Option<String>,
    title: String,
    content: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    category_name: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    view_count: u64,
    #[serde(default)]
    helpful_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

/// Title and content are all a similarity hit needs.
#[derive(Deserialize)]
struct SimilarPayload {
    #[serde(default)]
    article_id: Option<String>,
    title: String,
    content: String,
}

/// Coordinates embedding, filtering, vector search and result mapping.
pub struct RetrievalOrchestrator {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    embedding: EmbeddingConfig,
    search: SearchConfig,
    chunker: TextChunker,
}

impl RetrievalOrchestrator {
    /// Create an orchestrator over shared providers.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the configured chunk size is zero
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        config: &KbConfig,
    ) -> Result<Self> {
        Ok(Self {
            embedder,
            index,
            chunker: TextChunker::from_config(&config.embedding)?,
            embedding: config.embedding.clone(),
            search: config.search.clone(),
        })
    }

    /// Ranked articles for a query, filtered to the tenant and project.
    ///
    /// # Errors
    /// Returns `InvalidInput` on a zero limit or empty identities, and
    /// propagates provider failures
    pub async fn search_articles(&self, request: &ArticleSearch) -> Result<Vec<RetrievedArticle>> {
        let limit = self.effective_limit(request.limit)?;
        let filter = FilterBuilder::build(
            &request.tenant_id,
            &request.project_id,
            request.options.as_ref(),
        )?;

        let vector = self.embed_query(&request.query).await?;
        let hits = self
            .index
            .search(VectorQuery {
                vector,
                filter,
                limit,
                offset: request.offset,
                score_threshold: Some(self.search.min_score),
            })
            .await
            .inspect_err(|err| error!("Article search failed: {err}"))?;

        let articles = hits
            .into_iter()
            .enumerate()
            .map(|(position, hit)| to_article(hit, request.offset + position + 1, &request.query))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Article search for tenant {} returned {} results",
            request.tenant_id,
            articles.len()
        );
        Ok(articles)
    }

    /// One page of ranked articles with pagination metadata.
    ///
    /// # Errors
    /// Same as [`Self::search_articles`]
    pub async fn search_page(&self, request: &ArticleSearch) -> Result<SearchPage> {
        let started = Instant::now();
        let per_page = self.effective_limit(request.limit)?;
        let results = self.search_articles(request).await?;

        let max_score = results
            .iter()
            .map(|article| article.score)
            .fold(None, |best: Option<f32>, score| Some(best.map_or(score, |best| best.max(score))))
            .unwrap_or(0.0);

        Ok(SearchPage {
            total: results.len(),
            query: request.query.clone(),
            took_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            page: request.offset / per_page + 1,
            per_page,
            max_score,
            results,
        })
    }

    /// Stored items similar to `text` within a tenant and project.
    ///
    /// # Errors
    /// Returns `InvalidInput` on a zero limit or empty identities, and
    /// propagates provider failures
    pub async fn search_similar(
        &self,
        text: &str,
        tenant_id: &str,
        project_id: &str,
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<SimilarityResult>> {
        let limit = self.effective_limit(limit)?;
        let filter = FilterBuilder::build(tenant_id, project_id, None)?;
        let vector = self.embed_query(text).await?;

        let hits = self
            .index
            .search(VectorQuery {
                vector,
                filter,
                limit,
                offset: 0,
                score_threshold: Some(threshold),
            })
            .await
            .inspect_err(|err| error!("Similarity search failed: {err}"))?;

        let results = hits
            .into_iter()
            .map(to_similarity)
            .collect::<Result<Vec<_>>>()?;
        debug!("Similarity search returned {} results", results.len());
        Ok(results)
    }

    /// Embed `title + "\n\n" + content` and store one point for the article.
    ///
    /// # Errors
    /// Returns `InvalidInput` on an empty id, and propagates provider failures
    pub async fn index_article(&self, article: &IndexedArticle) -> Result<()> {
        require_id(&article.id)?;
        let text = format!("{}\n\n{}", article.title, article.content);
        let vector = self.embed_query(&text).await?;

        let mut payload = Payload::default();
        payload.insert("title".to_owned(), Value::from(article.title.as_str()));
        payload.insert("content".to_owned(), Value::from(article.content.as_str()));
        payload.extend(article.metadata.clone());

        self.index
            .upsert(&article.id, vector, payload)
            .await
            .inspect_err(|err| error!("Failed to index article {}: {err}", article.id))?;
        info!("Indexed article {}", article.id);
        Ok(())
    }

    /// Chunk the article content and store one point per chunk.
    ///
    /// Returns the number of chunk points written.
    ///
    /// # Errors
    /// Returns `InvalidInput` on an empty id, `EmbeddingUnavailable` when the
    /// provider returns the wrong number of vectors, and propagates provider failures
    pub async fn index_chunks(&self, article: &IndexedArticle) -> Result<usize> {
        require_id(&article.id)?;
        let chunks = self.chunker.chunk(&article.content, None, None);
        let texts = chunks
            .iter()
            .map(|chunk| normalize_for_embedding(&chunk.text, self.embedding.max_content_length))
            .collect::<Vec<_>>();

        let vectors = self
            .embedder
            .embed_batch(texts)
            .await
            .inspect_err(|err| error!("Failed to embed chunks of {}: {err}", article.id))?;
        if vectors.len() != chunks.len() {
            return Err(Error::EmbeddingUnavailable(format!(
                "expected {} chunk embeddings, got {}",
                chunks.len(),
                vectors.len()
            )));
        }

        for (chunk, vector) in chunks.iter().zip(vectors) {
            let mut payload = Payload::default();
            payload.insert("title".to_owned(), Value::from(article.title.as_str()));
            payload.insert("content".to_owned(), Value::from(chunk.text.as_str()));
            payload.extend(article.metadata.clone());
            payload.insert(ARTICLE_ID_KEY.to_owned(), Value::from(article.id.as_str()));
            payload.insert(CHUNK_INDEX_KEY.to_owned(), Value::from(chunk.ordinal_position));

            let point_id = chunk_point_id(&article.id, chunk.ordinal_position);
            self.index
                .upsert(&point_id, vector, payload)
                .await
                .inspect_err(|err| error!("Failed to index chunk {point_id}: {err}"))?;
        }

        info!("Indexed {} chunks for article {}", chunks.len(), article.id);
        Ok(chunks.len())
    }

    /// Remove the article point; unknown ids succeed.
    ///
    /// # Errors
    /// Propagates index failures
    pub async fn delete_article(&self, id: &str) -> Result<()> {
        require_id(id)?;
        self.index
            .delete(id)
            .await
            .inspect_err(|err| error!("Failed to delete article {id}: {err}"))?;
        info!("Deleted article {id}");
        Ok(())
    }

    /// Remove the first `chunk_count` chunk points of an article.
    ///
    /// # Errors
    /// Propagates index failures
    pub async fn delete_chunks(&self, article_id: &str, chunk_count: usize) -> Result<()> {
        require_id(article_id)?;
        for ordinal in 0..chunk_count {
            self.index
                .delete(&chunk_point_id(article_id, ordinal))
                .await
                .inspect_err(|err| error!("Failed to delete chunk {ordinal} of {article_id}: {err}"))?;
        }
        info!("Deleted {chunk_count} chunks for article {article_id}");
        Ok(())
    }

    fn effective_limit(&self, limit: usize) -> Result<usize> {
        if limit == 0 {
            return Err(Error::InvalidInput("limit must be positive".to_owned()));
        }
        Ok(limit.min(self.search.max_results))
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let normalized = normalize_for_embedding(text, self.embedding.max_content_length);
        self.embedder
            .embed(&normalized)
            .await
            .inspect_err(|err| error!("Embedding failed: {err}"))
    }
}

/// Point id of a chunk: UUID v5 of `"{article_id}#{ordinal}"`.
pub fn chunk_point_id(article_id: &str, ordinal: usize) -> String {
    Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("{article_id}#{ordinal}").as_bytes(),
    )
    .to_string()
}

fn require_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        Err(Error::InvalidInput("article id must not be empty".to_owned()))
    } else {
        Ok(())
    }
}

fn parse_payload<T: for<'de> Deserialize<'de>>(hit: &ScoredPoint) -> Result<T> {
    serde_json::from_value(Value::Object(hit.payload.clone()))
        .map_err(|err| Error::RetrievalFailure(format!("Malformed payload for point {}: {err}", hit.id)))
}

fn to_article(hit: ScoredPoint, rank: usize, query: &str) -> Result<RetrievedArticle> {
    let payload: ArticlePayload = parse_payload(&hit)?;
    Ok(RetrievedArticle {
        id: payload.article_id.unwrap_or(hit.id),
        snippet: extract_snippet(&payload.content, query, DEFAULT_SNIPPET_LENGTH),
        title: payload.title,
        content: payload.content,
        summary: payload.summary,
        score: hit.score,
        rank,
        tags: payload.tags,
        keywords: payload.keywords,
        category_name: payload.category_name,
        author_name: payload.author_name,
        view_count: payload.view_count,
        helpful_count: payload.helpful_count,
        created_at: payload.created_at,
        updated_at: payload.updated_at,
        published_at: payload.published_at,
    })
}

fn to_similarity(hit: ScoredPoint) -> Result<SimilarityResult> {
    let payload: SimilarPayload = parse_payload(&hit)?;
    Ok(SimilarityResult {
        id: payload.article_id.unwrap_or(hit.id),
        title: payload.title,
        content: payload.content,
        score: hit.score,
        kind: "article".to_owned(),
    })
}
