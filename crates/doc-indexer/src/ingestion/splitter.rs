use docqa_types::{Chunk, Document, deterministic_chunk_id};
use thiserror::Error;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SplitError {
    #[error("chunk size must be positive")]
    ZeroChunkSize,

    #[error("chunk overlap {overlap} must be smaller than chunk size {size}")]
    OverlapTooLarge { size: usize, overlap: usize },
}

/// Sliding-window parameters, measured in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitConfig {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SplitConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, SplitError> {
        if chunk_size == 0 {
            return Err(SplitError::ZeroChunkSize);
        }
        if chunk_overlap >= chunk_size {
            return Err(SplitError::OverlapTooLarge {
                size: chunk_size,
                overlap: chunk_overlap,
            });
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn step(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Cut `text` into windows of at most `chunk_size` characters, each starting
/// `chunk_size - chunk_overlap` characters after the previous one.
///
/// Returns `(start_char, piece)` pairs. Empty text yields nothing; text no
/// longer than one window yields itself.
pub fn split_text<'a>(text: &'a str, config: &SplitConfig) -> Vec<(usize, &'a str)> {
    if text.is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, including the end
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = bounds.len() - 1;

    let mut pieces = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + config.chunk_size).min(char_count);
        pieces.push((start, &text[bounds[start]..bounds[end]]));
        if end == char_count {
            break;
        }
        start += config.step();
    }
    pieces
}

/// Split every document, numbering chunks across the whole sequence.
pub fn split_documents(documents: &[Document], config: &SplitConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for doc in documents {
        for (start_char, piece) in split_text(&doc.text, config) {
            let ordinal = chunks.len();
            chunks.push(Chunk {
                text: piece.to_string(),
                metadata: doc.metadata(),
                ordinal,
                start_char,
                chunk_id: deterministic_chunk_id(&doc.source, ordinal, piece),
            });
        }
    }
    chunks
}
