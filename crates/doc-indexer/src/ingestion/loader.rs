use docqa_types::{Document, SourceKind};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not valid UTF-8 text")]
    InvalidUtf8(PathBuf),

    #[error("failed to extract text from PDF {path}: {reason}")]
    Pdf { path: PathBuf, reason: String },
}

/// Trait for turning a file on disk into documents
pub trait DocumentLoader: Send + Sync {
    /// Load `path` as `kind`. Text files yield one document, PDFs one per page.
    fn load(&self, path: &Path, kind: SourceKind) -> Result<Vec<Document>, LoadError>;
}

/// Loader backed by the local filesystem and `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLoader;

impl DocumentLoader for FileLoader {
    fn load(&self, path: &Path, kind: SourceKind) -> Result<Vec<Document>, LoadError> {
        match kind {
            SourceKind::Text => load_text(path).map(|doc| vec![doc]),
            SourceKind::Pdf => load_pdf(path),
        }
    }
}

pub fn load_text(path: &Path) -> Result<Document, LoadError> {
    let bytes = read_file(path)?;
    let text = String::from_utf8(bytes).map_err(|_| LoadError::InvalidUtf8(path.to_path_buf()))?;

    Ok(Document {
        source: source_name(path),
        kind: SourceKind::Text,
        page: None,
        text,
    })
}

pub fn load_pdf(path: &Path) -> Result<Vec<Document>, LoadError> {
    let bytes = read_file(path)?;
    let pdf_error = |reason: String| LoadError::Pdf {
        path: path.to_path_buf(),
        reason,
    };

    if !bytes.starts_with(b"%PDF-") {
        return Err(pdf_error("missing %PDF header".into()));
    }

    // pdf-extract panics on some malformed inputs
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .map_err(|_| pdf_error("parser panicked".into()))?
        .map_err(|e| pdf_error(e.to_string()))?;

    let source = source_name(path);
    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(page, text)| Document {
            source: source.clone(),
            kind: SourceKind::Pdf,
            page: Some(page as u32),
            text,
        })
        .collect())
}

fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
