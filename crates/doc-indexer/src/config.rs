//! Command-line / environment settings shared by the indexer and the chat server.

use clap::Args;
use docqa_store::{
    DEFAULT_API_BASE, DEFAULT_EMBEDDING_MODEL, EmbedError, EmbedderConfig, GeminiEmbedder,
    IndexError, VectorStore,
};
use docqa_types::{DEFAULT_INDEX_PREFIX, IndexNaming};
use std::path::PathBuf;

use crate::ingestion::splitter::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, SplitConfig, SplitError,
};
use crate::pipeline::PipelineConfig;

/// Where documents come from, how they are chunked, and where indexes live.
#[derive(Args, Debug, Clone)]
pub struct StorageArgs {
    /// Folder watched for .txt and .pdf files
    #[arg(long, env = "DOCQA_DOC_DIR", default_value = "./doc")]
    pub doc_dir: PathBuf,

    /// Directory holding persisted indexes
    #[arg(long, env = "DOCQA_INDEX_DIR", default_value = ".")]
    pub index_dir: PathBuf,

    /// Persisted index names are `<prefix>_<file name>`
    #[arg(long, env = "DOCQA_INDEX_PREFIX", default_value = DEFAULT_INDEX_PREFIX)]
    pub index_prefix: String,

    /// Chunk size in characters
    #[arg(long, env = "DOCQA_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[arg(long, env = "DOCQA_CHUNK_OVERLAP", default_value_t = DEFAULT_CHUNK_OVERLAP)]
    pub chunk_overlap: usize,
}

impl StorageArgs {
    pub fn open_store(&self) -> Result<VectorStore, IndexError> {
        VectorStore::new(&self.index_dir, IndexNaming::new(&self.index_prefix))
    }

    pub fn pipeline_config(&self) -> Result<PipelineConfig, SplitError> {
        Ok(PipelineConfig {
            doc_dir: self.doc_dir.clone(),
            split: SplitConfig::new(self.chunk_size, self.chunk_overlap)?,
        })
    }
}

/// Hosted embedding service settings.
#[derive(Args, Debug, Clone)]
pub struct EmbeddingArgs {
    /// API credential for the Gemini API
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Embedding model identifier
    #[arg(long, env = "DOCQA_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Base URL of the Gemini REST API
    #[arg(long, env = "DOCQA_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

impl EmbeddingArgs {
    pub fn build_embedder(&self) -> Result<GeminiEmbedder, EmbedError> {
        GeminiEmbedder::new(EmbedderConfig {
            api_key: self.api_key.clone(),
            model: self.embedding_model.clone(),
            api_base: self.api_base.clone(),
        })
    }
}
