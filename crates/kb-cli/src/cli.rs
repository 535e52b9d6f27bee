use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kb")]
#[command(about = "Knowledge-base retrieval and answering assistant", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (defaults to ~/.kb-assistant/config.toml)")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Tenant and project every search is scoped to.
#[derive(Args, Debug, Clone)]
pub struct Scope {
    #[arg(long, help = "Tenant identifier")]
    pub tenant: String,

    #[arg(long, help = "Project identifier")]
    pub project: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Index an article (JSON with id, title, content, metadata)")]
    Index {
        #[arg(help = "Article JSON file")]
        file: PathBuf,
    },

    #[command(about = "Index an article as overlapping chunks")]
    IndexChunks {
        #[arg(help = "Article JSON file")]
        file: PathBuf,
    },

    #[command(about = "Delete an article and optionally its chunks")]
    Delete {
        #[arg(help = "Article identifier")]
        id: String,

        #[arg(long, help = "Number of chunk points to delete as well")]
        chunks: Option<usize>,
    },

    #[command(about = "Search articles")]
    Search {
        #[arg(help = "Search query")]
        query: String,

        #[command(flatten)]
        scope: Scope,

        #[arg(long, default_value_t = 10, help = "Page size")]
        limit: usize,

        #[arg(long, default_value_t = 0, help = "Number of results to skip")]
        offset: usize,

        #[arg(long, help = "Only public articles")]
        public_only: bool,

        #[arg(long, help = "Accepted statuses")]
        status: Vec<String>,

        #[arg(long, help = "Accepted tags")]
        tags: Vec<String>,
    },

    #[command(about = "Find articles similar to a text")]
    Similar {
        #[arg(help = "Reference text")]
        text: String,

        #[command(flatten)]
        scope: Scope,

        #[arg(long, default_value_t = 5, help = "Maximum results")]
        limit: usize,

        #[arg(long, default_value_t = 0.7, help = "Minimum similarity")]
        threshold: f32,
    },

    #[command(about = "Answer a question from the knowledge base")]
    Ask {
        #[arg(help = "Question to answer")]
        question: String,

        #[command(flatten)]
        scope: Scope,

        #[arg(long, default_value_t = kb_assistant::DEFAULT_ASK_LIMIT, help = "Articles to retrieve")]
        limit: usize,
    },

    #[command(about = "Generate a summary for an article")]
    Summarize {
        #[arg(help = "Article JSON file")]
        file: PathBuf,
    },

    #[command(about = "Suggest keywords for an article")]
    Keywords {
        #[arg(help = "Article JSON file")]
        file: PathBuf,
    },

    #[command(about = "Rewrite article content according to feedback")]
    Improve {
        #[arg(help = "Article JSON file")]
        file: PathBuf,

        #[arg(long, help = "Reviewer feedback")]
        feedback: String,
    },

    #[command(about = "Generate embeddings for one or more texts")]
    Embed {
        #[arg(required = true, help = "Texts to embed")]
        texts: Vec<String>,
    },

    #[command(about = "Cosine similarity between two embeddings given as JSON arrays")]
    Similarity {
        #[arg(help = "First embedding, e.g. '[0.1, 0.2]'")]
        first: String,

        #[arg(help = "Second embedding")]
        second: String,
    },

    #[command(about = "Show how a text file would be chunked")]
    Chunk {
        #[arg(help = "Text file")]
        file: PathBuf,

        #[arg(long, help = "Chunk size in characters (overrides config)")]
        size: Option<usize>,

        #[arg(long, help = "Overlap in characters (overrides config)")]
        overlap: Option<usize>,
    },
}
