//! docqa-store: embedding and vector index storage for document QA
//!
//! This crate provides the hosted embedder and the per-file vector indexes
//! shared between doc-indexer (writes) and doc-qa-chat (reads).

pub mod embedder;
pub mod index;
pub mod vector_store;

pub use embedder::{
    DEFAULT_API_BASE, DEFAULT_EMBEDDING_MODEL, EmbedError, Embedder, EmbedderConfig,
    GeminiEmbedder,
};
pub use index::{IndexEntry, IndexError, IndexHeader, IndexSource, ScoredChunk, VectorIndex};
pub use vector_store::VectorStore;
