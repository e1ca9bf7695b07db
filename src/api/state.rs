use doc_indexer::{FileLoader, IndexingPipeline, PipelineConfig, PipelineReport, list_candidates};
use docqa_store::{Embedder, GeminiEmbedder, VectorStore};
use tokio::sync::Mutex;
use tracing::warn;

use super::dto::FileEntry;
use crate::engine::{Generator, LlmClient, RetrievalConfig};

/// Shared state for all handlers
pub struct AppState<E = GeminiEmbedder, G = LlmClient> {
    pub embedder: E,
    pub llm: G,

    pub store: VectorStore,
    pub pipeline: PipelineConfig,
    pub retrieval: RetrievalConfig,

    // One indexing pass at a time within this process
    index_lock: Mutex<()>,
}

impl<E: Embedder, G: Generator> AppState<E, G> {
    pub fn new(
        embedder: E,
        llm: G,
        store: VectorStore,
        pipeline: PipelineConfig,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            llm,
            store,
            pipeline,
            retrieval,
            index_lock: Mutex::new(()),
        }
    }

    /// Index every file in the watched folder that has no index yet.
    pub async fn reindex(&self) -> PipelineReport {
        let _guard = self.index_lock.lock().await;
        IndexingPipeline::new(&FileLoader, &self.embedder, &self.store, &self.pipeline)
            .run()
            .await
    }

    /// Files currently in the watched folder. An unreadable folder lists nothing.
    pub fn list_files(&self) -> Vec<FileEntry> {
        match list_candidates(&self.pipeline.doc_dir) {
            Ok(candidates) => candidates
                .into_iter()
                .map(|c| FileEntry {
                    indexed: self.store.exists(&c.file_name),
                    kind: c.kind.as_str(),
                    name: c.file_name,
                })
                .collect(),
            Err(e) => {
                warn!(dir = %self.pipeline.doc_dir.display(), error = %e, "cannot list watched folder");
                Vec::new()
            }
        }
    }
}
