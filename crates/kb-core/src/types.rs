use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filter::SearchFilter;

/// A single embedding vector.
pub type Embedding = Vec<f32>;

/// Arbitrary JSON payload stored alongside a vector.
pub type Payload = Map<String, Value>;

/// A bounded segment of a longer document, produced for embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Trimmed chunk text.
    pub text: String,
    /// Zero-based position of the chunk in the source document.
    pub ordinal_position: usize,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(text: impl Into<String>, ordinal_position: usize) -> Self {
        Self {
            text: text.into(),
            ordinal_position,
        }
    }
}

/// Optional search constraints layered on top of tenant and project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Restrict to articles flagged as public.
    #[serde(default)]
    pub public_only: bool,
    /// Accept any of these statuses.
    #[serde(default)]
    pub status: Vec<String>,
    /// Accept any of these tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An article to store in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedArticle {
    /// Point identifier, usually the article UUID.
    pub id: String,
    /// Article title.
    pub title: String,
    /// Article body.
    pub content: String,
    /// Extra payload fields (tenant, project, status, tags, counters, timestamps).
    #[serde(default)]
    pub metadata: Payload,
}

/// Nearest-neighbour query against the vector index.
#[derive(Debug, Clone, Serialize)]
pub struct VectorQuery {
    /// Query vector.
    pub vector: Embedding,
    /// Conjunctive filter the hits must satisfy.
    pub filter: SearchFilter,
    /// Maximum number of hits.
    pub limit: usize,
    /// Number of leading hits to skip.
    pub offset: usize,
    /// Minimum similarity a hit must reach.
    pub score_threshold: Option<f32>,
}

/// A raw hit returned by the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    /// Point identifier.
    pub id: String,
    /// Similarity score, higher is closer.
    pub score: f32,
    /// Stored payload.
    #[serde(default)]
    pub payload: Payload,
}

/// A ranked knowledge-base article produced by a search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedArticle {
    /// Article identifier.
    pub id: String,
    /// Article title.
    pub title: String,
    /// Full article content.
    pub content: String,
    /// Optional stored summary.
    pub summary: Option<String>,
    /// Provider-supplied similarity score.
    pub score: f32,
    /// 1-based rank across pages.
    pub rank: usize,
    /// Excerpt around the query match.
    pub snippet: String,
    /// Article tags.
    pub tags: Vec<String>,
    /// Article keywords.
    pub keywords: Vec<String>,
    /// Category display name.
    pub category_name: Option<String>,
    /// Author display name.
    pub author_name: Option<String>,
    /// Number of views.
    pub view_count: u64,
    /// Number of "helpful" votes.
    pub helpful_count: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Publication time, if published.
    pub published_at: Option<DateTime<Utc>>,
}

/// A lightweight similarity hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Article identifier.
    pub id: String,
    /// Article title.
    pub title: String,
    /// Article content.
    pub content: String,
    /// Similarity score.
    pub score: f32,
    /// Result kind, always `"article"` for now.
    #[serde(rename = "type")]
    pub kind: String,
}

/// One page of search results with ranking metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Ranked results.
    pub results: Vec<RetrievedArticle>,
    /// Number of results on this page.
    pub total: usize,
    /// Original query text.
    pub query: String,
    /// Wall time spent searching, in milliseconds.
    pub took_ms: u64,
    /// 1-based page number.
    pub page: usize,
    /// Requested page size.
    pub per_page: usize,
    /// Highest score on the page, `0.0` when empty.
    pub max_score: f32,
}

/// A generated answer together with its supporting sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// The question that was asked.
    pub question: String,
    /// Generated answer text (may be unhelpful when `has_answer` is false).
    pub answer_text: String,
    /// Heuristic confidence in `[0, 1]`.
    pub confidence: f32,
    /// Articles used as context.
    pub sources: Vec<RetrievedArticle>,
    /// Whether the answer should be surfaced.
    pub has_answer: bool,
    /// Fallback suggestions when no answer is surfaced.
    pub suggestions: Vec<String>,
    /// Short explanation of how the answer was produced.
    pub reasoning: String,
}
