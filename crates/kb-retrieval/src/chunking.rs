//! Overlapping, word-boundary-aware text chunking and embedding normalization.
//!
//! All lengths and positions are counted in `char`s so multi-byte text never
//! splits inside a code point.

use kb_core::{Chunk, EmbeddingConfig, Error, Result};

/// Splits long text into overlapping segments for embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunker {
    /// Default maximum chunk length in characters
    chunk_size: usize,
    /// Default overlap between consecutive chunks in characters
    overlap: usize,
}

impl TextChunker {
    /// Create a chunker with default size and overlap.
    ///
    /// # Errors
    /// Returns `InvalidInput` if `chunk_size` is zero
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidInput(
                "chunk size must be positive".to_owned(),
            ));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Create a chunker from the embedding configuration.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the configured chunk size is zero
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Default chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Default overlap.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into chunks, overriding the defaults when given.
    ///
    /// A `chunk_size` override of zero falls back to the default.
    pub fn chunk(&self, text: &str, chunk_size: Option<usize>, overlap: Option<usize>) -> Vec<Chunk> {
        let size = chunk_size
            .filter(|&size| size > 0)
            .unwrap_or(self.chunk_size);
        let overlap = overlap.unwrap_or(self.overlap);
        split_chunks(text, size, overlap)
    }
}

/// Core splitting loop; `size` is always positive here.
fn split_chunks(text: &str, size: usize, overlap: usize) -> Vec<Chunk> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    if len <= size {
        return vec![Chunk::new(text, 0)];
    }

    let mut chunks = Vec::default();
    let mut start = 0;

    while start < len {
        let mut end = start + size;

        if end < len
            && let Some(offset) = chars[start..end].iter().rposition(|&ch| ch == ' ')
            && offset > 0
        {
            end = start + offset;
        }

        // Cursor advances from the unclamped end: a window reaching the text
        // end is followed by an overlap-sized tail.
        let segment: String = chars[start..end.min(len)].iter().collect();
        let trimmed = segment.trim();
        if !trimmed.is_empty() {
            chunks.push(Chunk::new(trimmed, chunks.len()));
        }

        // Overlap >= chunk length would stall the cursor.
        let next = end.saturating_sub(overlap);
        start = if next > start { next } else { start + 1 };
    }

    chunks
}

/// Collapse whitespace runs and cut the text to `max_length` characters.
pub fn normalize_for_embedding(text: &str, max_length: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > max_length {
        collapsed.chars().take(max_length).collect()
    } else {
        collapsed
    }
}
