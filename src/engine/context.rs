use docqa_store::ScoredChunk;

/// Instruction placed ahead of the retrieved context
pub const QA_PREAMBLE: &str = "Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Format retrieved chunks into context for the LLM, nearest first
pub fn build_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the complete prompt sent to the LLM: all context, then the question
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "{preamble}\n\n{context}\n\nQuestion: {question}\nHelpful Answer:",
        preamble = QA_PREAMBLE,
        context = context,
        question = question
    )
}
