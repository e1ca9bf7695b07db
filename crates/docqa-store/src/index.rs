use docqa_types::Chunk;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bumped whenever the persisted layout changes; older blobs load as corrupt.
pub const INDEX_FORMAT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("cannot build an index from zero chunks")]
    EmptyInput,

    #[error("vector dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index was built with embedding model '{index_model}', not '{query_model}'")]
    ModelMismatch {
        index_model: String,
        query_model: String,
    },

    #[error("index '{0}' not found")]
    NotFound(String),

    #[error("index '{name}' is corrupt: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("index '{0}' already exists")]
    AlreadyExists(String),

    #[error("index storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Descriptive fields stored alongside the vectors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IndexHeader {
    pub format_version: u32,
    /// Source file name this index was built from.
    pub source: String,
    /// SHA256 of the source file content at indexing time.
    pub source_hash: String,
    pub embedding_model: String,
    pub dimension: usize,
    pub chunk_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// A chunk returned by [`VectorIndex::query`] with its distance from the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub distance: f32,
}

/// Provenance for a new index.
#[derive(Debug, Clone)]
pub struct IndexSource {
    pub name: String,
    pub content_hash: String,
    pub embedding_model: String,
}

/// Flat in-memory similarity index over one source file's chunks.
///
/// Search is exact: every entry is compared against the query by squared
/// Euclidean distance. Entries keep insertion order, which breaks ties.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VectorIndex {
    header: IndexHeader,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn build(source: IndexSource, pairs: Vec<(Chunk, Vec<f32>)>) -> Result<Self, IndexError> {
        let dimension = match pairs.first() {
            Some((_, vector)) => vector.len(),
            None => return Err(IndexError::EmptyInput),
        };
        if dimension == 0 {
            return Err(IndexError::DimensionMismatch {
                expected: 1,
                actual: 0,
            });
        }
        if let Some((_, bad)) = pairs.iter().find(|(_, v)| v.len() != dimension) {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        let entries: Vec<IndexEntry> = pairs
            .into_iter()
            .map(|(chunk, vector)| IndexEntry { chunk, vector })
            .collect();

        Ok(Self {
            header: IndexHeader {
                format_version: INDEX_FORMAT_VERSION,
                source: source.name,
                source_hash: source.content_hash,
                embedding_model: source.embedding_model,
                dimension,
                chunk_count: entries.len(),
            },
            entries,
        })
    }

    pub fn header(&self) -> &IndexHeader {
        &self.header
    }

    pub fn source(&self) -> &str {
        &self.header.source
    }

    pub fn dimension(&self) -> usize {
        self.header.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Vectors from different embedding models are not comparable.
    pub fn check_model(&self, model_id: &str) -> Result<(), IndexError> {
        if self.header.embedding_model == model_id {
            Ok(())
        } else {
            Err(IndexError::ModelMismatch {
                index_model: self.header.embedding_model.clone(),
                query_model: model_id.to_string(),
            })
        }
    }

    /// Return up to `k` chunks nearest to `query`, nearest first.
    pub fn query(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        if query.len() != self.header.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.header.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, squared_l2(&entry.vector, query)))
            .collect();

        // Stable: equal distances stay in insertion order
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, distance)| ScoredChunk {
                chunk: self.entries[i].chunk.clone(),
                distance,
            })
            .collect())
    }

    /// Structural checks run after deserializing a persisted blob.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.header.format_version != INDEX_FORMAT_VERSION {
            return Err(format!(
                "unsupported format version {}",
                self.header.format_version
            ));
        }
        if self.entries.is_empty() {
            return Err("no entries".into());
        }
        if self.entries.len() != self.header.chunk_count {
            return Err(format!(
                "header declares {} chunks, found {}",
                self.header.chunk_count,
                self.entries.len()
            ));
        }
        if self
            .entries
            .iter()
            .any(|e| e.vector.len() != self.header.dimension)
        {
            return Err("vector dimension does not match header".into());
        }
        Ok(())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
