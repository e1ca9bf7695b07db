use docqa_store::{Embedder, ScoredChunk, VectorStore};

use super::EngineError;
use super::config::RetrievalConfig;

/// Retrieved context from one file's index
#[derive(Debug)]
pub struct RetrievalResult {
    pub file_name: String,
    pub chunks: Vec<ScoredChunk>,
}

/// 1. Load the selected file's index
/// 2. Embed the question with the model the index was built with
/// 3. Return the nearest chunks
pub async fn retrieve<E: Embedder>(
    question: &str,
    file_name: &str,
    embedder: &E,
    store: &VectorStore,
    config: &RetrievalConfig,
) -> Result<RetrievalResult, EngineError> {
    // Fails with NotFound before any network call if the file was never indexed
    let index = store.load(file_name)?;
    index.check_model(embedder.model_id())?;

    let query_embedding = embedder.embed_query(question).await?;
    let chunks = index.query(&query_embedding, config.top_k)?;

    Ok(RetrievalResult {
        file_name: file_name.to_string(),
        chunks,
    })
}
