mod config;
pub mod context;
pub mod generator;
pub mod retriever;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{DEFAULT_CHAT_MODEL, DEFAULT_TOP_K, RetrievalConfig};
pub use generator::{Generator, LlmClient};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("index error: {0}")]
    Index(#[from] docqa_store::IndexError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] docqa_store::EmbedError),

    #[error("answer generation failed: {0}")]
    Generation(String),
}
