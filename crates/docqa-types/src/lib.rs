use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Default prefix for persisted index names, e.g. `faiss_index_notes.txt`.
pub const DEFAULT_INDEX_PREFIX: &str = "faiss_index";

/// Generate SHA256 hash of content.
/// Normalizes CRLF → LF before hashing for cross-OS consistency.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.replace("\r\n", "\n").as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Deterministic chunk ID from source file + chunk position + content.
/// Same chunk in the same file = same ID across re-indexing runs.
pub fn deterministic_chunk_id(source: &str, ordinal: usize, content: &str) -> String {
    content_hash(&format!("chunk:{}:{}:{}", source, ordinal, content))
}

/// File types the loader understands.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    Pdf,
}

impl SourceKind {
    /// Classify a path by extension (case-insensitive). `None` for anything else.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("txt") {
            Some(Self::Text)
        } else if ext.eq_ignore_ascii_case("pdf") {
            Some(Self::Pdf)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
        }
    }
}

/// A unit of loaded text: a whole text file, or one PDF page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub source: String, // file name inside the watched folder, e.g. "notes.txt"
    pub kind: SourceKind,
    pub page: Option<u32>, // 0-based, PDFs only
    pub text: String,
}

impl Document {
    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            source: self.source.clone(),
            kind: self.kind,
            page: self.page,
        }
    }
}

/// Origin of a chunk. Carried unchanged from the document it was cut from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub source: String,
    pub kind: SourceKind,
    pub page: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub metadata: ChunkMetadata,

    /// Position of this chunk within its file, counting across pages.
    pub ordinal: usize,
    /// Character offset of the chunk start inside its document.
    pub start_char: usize,

    /// Deterministic ID: hash(source, ordinal, text).
    pub chunk_id: String,
}

/// Derives persisted index names from source file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexNaming {
    prefix: String,
}

impl IndexNaming {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `<prefix>_<file_name>`
    pub fn index_name(&self, file_name: &str) -> String {
        format!("{}_{}", self.prefix, file_name)
    }

    /// Inverse of [`IndexNaming::index_name`]. `None` if the name has a different prefix.
    pub fn source_name<'a>(&self, index_name: &'a str) -> Option<&'a str> {
        index_name
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('_')
            .filter(|rest| !rest.is_empty())
    }
}

impl Default for IndexNaming {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_PREFIX)
    }
}
