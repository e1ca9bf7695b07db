use docqa_store::ScoredChunk;
use serde::{Deserialize, Serialize};

const SNIPPET_CHARS: usize = 240;

/// POST /api/ask request
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// File name inside the watched folder
    pub file: String,
    pub question: String,
}

/// POST /api/ask response
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub file: String,
    pub answer: String,
    pub sources: Vec<SourceInfo>,
}

/// Chunk the answer was conditioned on.
#[derive(Debug, Serialize, Clone)]
pub struct SourceInfo {
    pub source: String,
    /// 0-based page for PDFs
    pub page: Option<u32>,
    /// Human-readable position, e.g. "page 3" or "chunk 2"
    pub location: String,
    pub ordinal: usize,
    /// Squared L2 distance from the question (lower = closer)
    pub distance: f32,
    pub snippet: String,
}

impl SourceInfo {
    pub fn from_scored(s: &ScoredChunk) -> Self {
        let location = match s.chunk.metadata.page {
            Some(page) => format!("page {}", page + 1),
            None => format!("chunk {}", s.chunk.ordinal + 1),
        };
        Self {
            source: s.chunk.metadata.source.clone(),
            page: s.chunk.metadata.page,
            location,
            ordinal: s.chunk.ordinal,
            distance: s.distance,
            snippet: snippet(&s.chunk.text),
        }
    }
}

pub fn build_sources(chunks: &[ScoredChunk]) -> Vec<SourceInfo> {
    chunks.iter().map(SourceInfo::from_scored).collect()
}

fn snippet(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= SNIPPET_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(SNIPPET_CHARS).collect();
    cut.push('…');
    cut
}

/// A document in the watched folder
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub kind: &'static str,
    pub indexed: bool,
}

/// GET /api/files response
#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub files: Vec<FileEntry>,
    pub count: usize,
}

/// GET /health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
