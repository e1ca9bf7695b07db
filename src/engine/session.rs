//! One retrieval-QA round trip: selected file + question → answer text.
//!
//! Each question is answered from a fresh prompt; nothing carries over
//! between questions.

use docqa_store::{Embedder, ScoredChunk, VectorStore};
use tracing::info;

use super::config::RetrievalConfig;
use super::generator::Generator;
use super::{EngineError, context, retriever};

#[derive(Debug)]
pub struct Answer {
    pub file_name: String,
    /// Chat model output, verbatim
    pub answer: String,
    /// Chunks the answer was conditioned on, nearest first
    pub sources: Vec<ScoredChunk>,
}

pub async fn ask<E: Embedder, G: Generator>(
    question: &str,
    file_name: &str,
    embedder: &E,
    llm: &G,
    store: &VectorStore,
    config: &RetrievalConfig,
) -> Result<Answer, EngineError> {
    let result = retriever::retrieve(question, file_name, embedder, store, config).await?;
    info!(file = %file_name, retrieved = result.chunks.len(), "context retrieved");

    let context = context::build_context(&result.chunks);
    let prompt = context::build_prompt(question, &context);

    let answer = llm.generate(&prompt).await?;
    if answer.trim().is_empty() {
        return Err(EngineError::Generation(
            "chat model returned an empty answer".into(),
        ));
    }

    Ok(Answer {
        file_name: result.file_name,
        answer,
        sources: result.chunks,
    })
}
