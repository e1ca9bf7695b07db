//! Offline fakes shared by engine and api tests.

use doc_indexer::{
    Document, DocumentLoader, FileLoader, IndexingPipeline, LoadError, PipelineConfig,
    SourceKind, SplitConfig,
};
use docqa_store::{EmbedError, Embedder, ScoredChunk, VectorStore};
use docqa_types::{Chunk, ChunkMetadata, IndexNaming, deterministic_chunk_id};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

use super::EngineError;
use super::context::QA_PREAMBLE;
use super::generator::Generator;

pub(crate) const DIM: usize = 32;

pub(crate) const NOTES_SENTENCE: &str =
    "The lighthouse on the northern cape is painted red and white. ";

pub(crate) fn scored(text: &str, distance: f32) -> ScoredChunk {
    ScoredChunk {
        chunk: Chunk {
            text: text.into(),
            metadata: ChunkMetadata {
                source: "notes.txt".into(),
                kind: SourceKind::Text,
                page: None,
            },
            ordinal: 0,
            start_char: 0,
            chunk_id: deterministic_chunk_id("notes.txt", 0, text),
        },
        distance,
    }
}

/// Bag-of-words hashing embedder. Texts sharing words land close together.
pub(crate) struct WordEmbedder;

pub(crate) fn embed_words(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut hasher = DefaultHasher::new();
        word.to_lowercase().hash(&mut hasher);
        v[(hasher.finish() % DIM as u64) as usize] += 1.0;
    }
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

impl Embedder for WordEmbedder {
    fn model_id(&self) -> &str {
        "word-hash-test"
    }

    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|t| embed_words(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(embed_words(text))
    }
}

/// Same vectors as [`WordEmbedder`] under another model id.
pub(crate) struct RenamedEmbedder(pub &'static str);

impl Embedder for RenamedEmbedder {
    fn model_id(&self) -> &str {
        self.0
    }

    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|t| embed_words(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(embed_words(text))
    }
}

/// Answers with the first context chunk of the prompt, and keeps every prompt.
#[derive(Default)]
pub(crate) struct EchoGenerator {
    prompts: Mutex<Vec<String>>,
}

impl EchoGenerator {
    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, EngineError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let context = prompt
            .strip_prefix(QA_PREAMBLE)
            .and_then(|rest| rest.split("\n\nQuestion:").next())
            .unwrap_or_default()
            .trim_start_matches('\n');
        Ok(context.split("\n\n").next().unwrap_or_default().to_string())
    }
}

/// Always answers with the same text.
pub(crate) struct FixedGenerator(String);

impl FixedGenerator {
    pub(crate) fn new(reply: &str) -> Self {
        Self(reply.into())
    }
}

impl Generator for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, EngineError> {
        Ok(self.0.clone())
    }
}

/// Text files load for real; every PDF is three fixed pages.
pub(crate) struct StubPdfLoader;

impl DocumentLoader for StubPdfLoader {
    fn load(&self, path: &Path, kind: SourceKind) -> Result<Vec<Document>, LoadError> {
        match kind {
            SourceKind::Text => FileLoader.load(path, kind),
            SourceKind::Pdf => {
                let source = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                Ok((0..3)
                    .map(|page| Document {
                        source: source.clone(),
                        kind: SourceKind::Pdf,
                        page: Some(page),
                        text: format!("Quarterly revenue grew on page {page}. ").repeat(10),
                    })
                    .collect())
            }
        }
    }
}

pub(crate) struct Fixture {
    pub docs: TempDir,
    pub _indexes: TempDir,
    pub store: VectorStore,
    pub config: PipelineConfig,
}

pub(crate) fn empty_fixture() -> Fixture {
    let docs = TempDir::new().unwrap();
    let indexes = TempDir::new().unwrap();
    let store = VectorStore::new(indexes.path(), IndexNaming::default()).unwrap();
    let config = PipelineConfig {
        doc_dir: docs.path().to_path_buf(),
        split: SplitConfig::new(200, 20).unwrap(),
    };
    Fixture {
        docs,
        _indexes: indexes,
        store,
        config,
    }
}

/// `notes.txt` and `report.pdf`, both already indexed with [`WordEmbedder`].
pub(crate) async fn indexed_fixture() -> Fixture {
    let fx = empty_fixture();
    fs::write(fx.docs.path().join("notes.txt"), NOTES_SENTENCE.repeat(8)).unwrap();
    fs::write(fx.docs.path().join("report.pdf"), b"%PDF-1.4 stub").unwrap();

    let report = IndexingPipeline::new(&StubPdfLoader, &WordEmbedder, &fx.store, &fx.config)
        .run()
        .await;
    assert_eq!(report.indexed(), 2, "fixture indexing failed: {report:?}");
    fx
}
