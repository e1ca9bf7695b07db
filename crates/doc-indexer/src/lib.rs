//! doc-indexer: turns a watched folder of documents into per-file vector indexes
//!
//! This crate handles loading and chunking documents and the indexing pass.
//! For embedding and storage, it uses the shared docqa-store crate.

pub mod config;
pub mod ingestion;
pub mod pipeline;

pub use docqa_types::{Chunk, ChunkMetadata, Document, SourceKind};
pub use ingestion::loader::{DocumentLoader, FileLoader, LoadError};
pub use ingestion::splitter::{SplitConfig, SplitError, split_documents, split_text};
pub use ingestion::{Candidate, list_candidates};
pub use pipeline::{
    FileOutcome, FileReport, IndexingPipeline, PipelineConfig, PipelineError, PipelineReport,
    SourceState, fingerprint, source_state,
};

// Re-export store functionality for convenience
pub use docqa_store::{EmbedError, Embedder, GeminiEmbedder, IndexError, VectorStore};
