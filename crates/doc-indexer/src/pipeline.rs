//! Watched folder → Loader → Splitter → Embedder → Vector Index → disk
//!
//! Every candidate file ends in exactly one of three states: skipped (an index
//! already exists), indexed, or failed. A failure only affects its own file and
//! never leaves a partial index behind, because persisting is the last step.

use docqa_store::{
    EmbedError, Embedder, IndexError, IndexHeader, IndexSource, VectorIndex, VectorStore,
};
use docqa_types::{Document, content_hash};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::ingestion::loader::{DocumentLoader, LoadError};
use crate::ingestion::splitter::{SplitConfig, split_documents};
use crate::ingestion::{Candidate, list_candidates};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    #[error("embedding failed: {0}")]
    Embed(#[from] EmbedError),

    #[error("index failed: {0}")]
    Index(#[from] IndexError),
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub doc_dir: PathBuf,
    pub split: SplitConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Skipped,
    Indexed { chunks: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub file_name: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Result of one pass over the watched folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub files: Vec<FileReport>,
}

impl PipelineReport {
    pub fn indexed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Indexed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    pub fn outcome_for(&self, file_name: &str) -> Option<&FileOutcome> {
        self.files
            .iter()
            .find(|f| f.file_name == file_name)
            .map(|f| &f.outcome)
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

pub struct IndexingPipeline<'a, L, E> {
    loader: &'a L,
    embedder: &'a E,
    store: &'a VectorStore,
    config: &'a PipelineConfig,
}

impl<'a, L: DocumentLoader, E: Embedder> IndexingPipeline<'a, L, E> {
    pub fn new(
        loader: &'a L,
        embedder: &'a E,
        store: &'a VectorStore,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            loader,
            embedder,
            store,
            config,
        }
    }

    /// Index every unindexed candidate in the watched folder.
    ///
    /// A missing folder is logged and yields an empty report.
    pub async fn run(&self) -> PipelineReport {
        let candidates = match list_candidates(&self.config.doc_dir) {
            Ok(c) => c,
            Err(e) => {
                warn!(dir = %self.config.doc_dir.display(), error = %e, "cannot list watched folder");
                return PipelineReport::default();
            }
        };

        let mut report = PipelineReport::default();
        for candidate in &candidates {
            let outcome = self.process(candidate).await;
            report.files.push(FileReport {
                file_name: candidate.file_name.clone(),
                outcome,
            });
        }

        info!(
            indexed = report.indexed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "indexing pass complete"
        );
        report
    }

    async fn process(&self, candidate: &Candidate) -> FileOutcome {
        if self.store.exists(&candidate.file_name) {
            info!(file = %candidate.file_name, outcome = "skipped", "already indexed");
            return FileOutcome::Skipped;
        }

        match self.index_file(candidate).await {
            Ok(chunks) => {
                info!(file = %candidate.file_name, chunks, outcome = "indexed", "indexed file");
                FileOutcome::Indexed { chunks }
            }
            // Another run persisted this file between our check and our write
            Err(PipelineError::Index(IndexError::AlreadyExists(_))) => {
                info!(file = %candidate.file_name, outcome = "skipped", "indexed concurrently");
                FileOutcome::Skipped
            }
            Err(e) => {
                warn!(file = %candidate.file_name, error = %e, outcome = "failed", "indexing failed");
                FileOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Load → split → embed → build → persist. Returns the chunk count.
    async fn index_file(&self, candidate: &Candidate) -> Result<usize, PipelineError> {
        let documents = self.loader.load(&candidate.path, candidate.kind)?;
        let chunks = split_documents(&documents, &self.config.split);
        if chunks.is_empty() {
            return Err(IndexError::EmptyInput.into());
        }

        let vectors = {
            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            self.embedder.embed_documents(&texts).await?
        };
        if vectors.len() != chunks.len() {
            return Err(EmbedError::Malformed(format!(
                "{} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            ))
            .into());
        }

        let source = IndexSource {
            name: candidate.file_name.clone(),
            content_hash: fingerprint(&documents),
            embedding_model: self.embedder.model_id().to_string(),
        };

        let count = chunks.len();
        let index = VectorIndex::build(source, chunks.into_iter().zip(vectors).collect())?;
        self.store.persist(&index)?;
        Ok(count)
    }
}

/// Hash of a file's extracted text, recorded in its index header.
pub fn fingerprint(documents: &[Document]) -> String {
    let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
    content_hash(&texts.join("\n"))
}

/// How a persisted index relates to its source file as it is now.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceState {
    Fresh,
    /// Source text changed since indexing
    Stale,
    Unreadable(String),
}

pub fn source_state(
    loader: &impl DocumentLoader,
    candidate: &Candidate,
    header: &IndexHeader,
) -> SourceState {
    match loader.load(&candidate.path, candidate.kind) {
        Ok(docs) if fingerprint(&docs) == header.source_hash => SourceState::Fresh,
        Ok(_) => SourceState::Stale,
        Err(e) => SourceState::Unreadable(e.to_string()),
    }
}
