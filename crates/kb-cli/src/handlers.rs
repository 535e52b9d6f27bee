use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use kb_assistant::{AnswerService, KnowledgeAssistant, OllamaGenerationClient};
use kb_core::{
    Embedding, EmbeddingProvider, GenerationProvider as _, IndexedArticle, KbConfig,
    SearchOptions, VectorIndex as _,
};
use kb_retrieval::{
    ArticleSearch, OllamaEmbeddingClient, QdrantIndex, RetrievalOrchestrator, TextChunker,
    cosine_similarity,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::cli::{Commands, Scope};

/// Install the stderr tracing subscriber.
pub fn init_logging() {
    let _result = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "kb_retrieval=info,kb_assistant=info,kb_cli=info".into()
        }))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .try_init();
}

/// Load the config file, then apply environment overrides.
///
/// # Errors
/// Returns an error if the config cannot be read, parsed or created
pub fn load_config(path: Option<&Path>) -> Result<KbConfig> {
    let config = match path {
        Some(path) => KbConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => KbConfig::load_or_create().context("Failed to load default config")?,
    };
    let config = config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Embedding provider and vector index with their lifecycle.
struct Retrieval {
    embedder: Arc<OllamaEmbeddingClient>,
    index: Arc<QdrantIndex>,
    orchestrator: Arc<RetrievalOrchestrator>,
}

impl Retrieval {
    async fn connect(config: &KbConfig) -> Result<Self> {
        let embedder = Arc::new(OllamaEmbeddingClient::new(&config.ollama, &config.embedding)?);
        embedder.initialize().await?;

        let index = Arc::new(QdrantIndex::new(
            &config.qdrant,
            config.search.collection.as_str(),
            config.embedding.dimension,
        )?);
        index.initialize().await?;

        let orchestrator = Arc::new(RetrievalOrchestrator::new(
            Arc::clone(&embedder) as _,
            Arc::clone(&index) as _,
            config,
        )?);
        info!(
            "Retrieval ready (embedding model {}, collection {})",
            embedder.model(),
            config.search.collection
        );
        Ok(Self {
            embedder,
            index,
            orchestrator,
        })
    }

    async fn shutdown(self) {
        self.index.shutdown().await;
        self.embedder.shutdown().await;
    }
}

/// One embedded text as printed by `kb embed`.
#[derive(Debug, Serialize)]
struct EmbeddingOutput {
    embedding: Embedding,
    model: String,
    dimension: usize,
}

/// Embed `texts`, using a single call for one text and a batch call otherwise.
async fn embed_texts(
    embedder: &dyn EmbeddingProvider,
    model: &str,
    texts: Vec<String>,
) -> Result<Vec<EmbeddingOutput>> {
    let embeddings = if let [text] = texts.as_slice() {
        vec![embedder.embed(text).await?]
    } else {
        embedder.embed_batch(texts).await?
    };
    Ok(embeddings
        .into_iter()
        .map(|embedding| EmbeddingOutput {
            dimension: embedding.len(),
            embedding,
            model: model.to_owned(),
        })
        .collect())
}

fn parse_embedding(raw: &str) -> Result<Embedding> {
    serde_json::from_str(raw).context("Embedding must be a JSON array of numbers")
}

fn similarity_output(first: &str, second: &str) -> Result<serde_json::Value> {
    let similarity = cosine_similarity(&parse_embedding(first)?, &parse_embedding(second)?)?;
    Ok(serde_json::json!({"similarity": similarity}))
}

async fn answer_service(config: &KbConfig) -> Result<AnswerService> {
    let generator = Arc::new(OllamaGenerationClient::new(
        &config.ollama,
        &config.generation,
    )?);
    generator.initialize().await;
    Ok(AnswerService::new(generator, config.generation.clone()))
}

async fn read_article(path: &Path) -> Result<IndexedArticle> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse article JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run one subcommand and print its JSON result.
///
/// # Errors
/// Returns an error if a provider cannot be reached or the operation fails
pub async fn handle(command: Commands, config: &KbConfig) -> Result<()> {
    match command {
        Commands::Chunk {
            file,
            size,
            overlap,
        } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let chunker = TextChunker::from_config(&config.embedding)?;
            print_json(&chunker.chunk(&text, size, overlap))
        }
        Commands::Embed { texts } => {
            let embedder = OllamaEmbeddingClient::new(&config.ollama, &config.embedding)?;
            embedder.initialize().await?;
            let outcome = embed_texts(&embedder, embedder.model(), texts).await;
            embedder.shutdown().await;
            match outcome?.as_slice() {
                [single] => print_json(single),
                outputs => print_json(&outputs),
            }
        }
        Commands::Similarity { first, second } => print_json(&similarity_output(&first, &second)?),
        Commands::Summarize { file } => {
            let article = read_article(&file).await?;
            let service = answer_service(config).await?;
            let summary = service.generate_summary(&article.title, &article.content).await;
            service.shutdown().await;
            print_json(&serde_json::json!({"id": article.id, "summary": summary}))
        }
        Commands::Keywords { file } => {
            let article = read_article(&file).await?;
            let service = answer_service(config).await?;
            let keywords = service.suggest_keywords(&article.title, &article.content).await;
            service.shutdown().await;
            print_json(&serde_json::json!({"id": article.id, "keywords": keywords}))
        }
        Commands::Improve { file, feedback } => {
            let article = read_article(&file).await?;
            let service = answer_service(config).await?;
            let content = service.improve_content(&article.content, &feedback).await;
            service.shutdown().await;
            print_json(&serde_json::json!({"id": article.id, "content": content}))
        }
        retrieval_command => {
            let retrieval = Retrieval::connect(config).await?;
            let outcome = handle_retrieval(retrieval_command, &retrieval, config).await;
            retrieval.shutdown().await;
            outcome
        }
    }
}

async fn handle_retrieval(command: Commands, retrieval: &Retrieval, config: &KbConfig) -> Result<()> {
    let orchestrator = &retrieval.orchestrator;
    match command {
        Commands::Index { file } => {
            let article = read_article(&file).await?;
            orchestrator.index_article(&article).await?;
            print_json(&serde_json::json!({"id": article.id, "indexed": true}))
        }
        Commands::IndexChunks { file } => {
            let article = read_article(&file).await?;
            let chunks = orchestrator.index_chunks(&article).await?;
            print_json(&serde_json::json!({"id": article.id, "chunks": chunks}))
        }
        Commands::Delete { id, chunks } => {
            orchestrator.delete_article(&id).await?;
            if let Some(count) = chunks {
                orchestrator.delete_chunks(&id, count).await?;
            }
            print_json(&serde_json::json!({"id": id, "deleted": true}))
        }
        Commands::Search {
            query,
            scope: Scope { tenant, project },
            limit,
            offset,
            public_only,
            status,
            tags,
        } => {
            let request = ArticleSearch::new(query, tenant, project)
                .with_limit(limit)
                .with_offset(offset)
                .with_options(SearchOptions {
                    public_only,
                    status,
                    tags,
                });
            print_json(&orchestrator.search_page(&request).await?)
        }
        Commands::Similar {
            text,
            scope,
            limit,
            threshold,
        } => {
            let results = orchestrator
                .search_similar(&text, &scope.tenant, &scope.project, limit, threshold)
                .await?;
            print_json(&results)
        }
        Commands::Ask {
            question,
            scope,
            limit,
        } => {
            let assistant =
                KnowledgeAssistant::new(Arc::clone(orchestrator), answer_service(config).await?);
            let answer = assistant
                .ask(&question, &scope.tenant, &scope.project, limit)
                .await;
            assistant.answers().shutdown().await;
            print_json(&answer?)
        }
        Commands::Chunk { .. }
        | Commands::Embed { .. }
        | Commands::Similarity { .. }
        | Commands::Summarize { .. }
        | Commands::Keywords { .. }
        | Commands::Improve { .. } => {
            anyhow::bail!("command does not use the retrieval pipeline")
        }
    }
}
