use docqa_types::IndexNaming;
use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::index::{IndexError, VectorIndex};

/// On-disk home for persisted indexes: one blob per source file, named
/// `<prefix>_<file_name>` inside the storage directory.
///
/// Presence of a blob is what marks a file as indexed.
#[derive(Debug, Clone)]
pub struct VectorStore {
    root: PathBuf,
    naming: IndexNaming,
}

impl VectorStore {
    /// Open the storage directory (creates if not exists).
    pub fn new(root: impl Into<PathBuf>, naming: IndexNaming) -> Result<Self, IndexError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, naming })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn naming(&self) -> &IndexNaming {
        &self.naming
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(self.naming.index_name(file_name))
    }

    pub fn exists(&self, file_name: &str) -> bool {
        self.path_for(file_name).is_file()
    }

    /// Write the index under its source name.
    ///
    /// The blob is fully written to a temp file in the same directory and then
    /// linked into place without replacing anything. A concurrent writer that
    /// got there first makes this fail with [`IndexError::AlreadyExists`] and
    /// the existing blob is left untouched.
    pub fn persist(&self, index: &VectorIndex) -> Result<PathBuf, IndexError> {
        let target = self.path_for(index.source());
        if target.exists() {
            return Err(IndexError::AlreadyExists(index.source().to_string()));
        }

        let mut tmp = tempfile::Builder::new()
            .prefix(".tmp-index-")
            .tempfile_in(&self.root)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, index).map_err(std::io::Error::from)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;

        tmp.persist_noclobber(&target).map_err(|e| {
            if e.error.kind() == ErrorKind::AlreadyExists {
                IndexError::AlreadyExists(index.source().to_string())
            } else {
                IndexError::Io(e.error)
            }
        })?;

        debug!(path = %target.display(), chunks = index.len(), "persisted index");
        Ok(target)
    }

    /// Reconstruct a previously persisted index.
    pub fn load(&self, file_name: &str) -> Result<VectorIndex, IndexError> {
        let path = self.path_for(file_name);
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(IndexError::NotFound(file_name.to_string()));
            }
            Err(e) => return Err(IndexError::Io(e)),
        };

        let corrupt = |reason: String| IndexError::Corrupt {
            name: file_name.to_string(),
            reason,
        };

        let index: VectorIndex =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| corrupt(e.to_string()))?;
        index.validate().map_err(corrupt)?;
        if index.source() != file_name {
            return Err(corrupt(format!(
                "blob belongs to '{}'",
                index.source()
            )));
        }

        Ok(index)
    }

    /// Source file names that have a persisted index, sorted.
    pub fn list_indexed(&self) -> Result<Vec<String>, IndexError> {
        let mut names: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                self.naming.source_name(&name).map(String::from)
            })
            .collect();
        names.sort();
        Ok(names)
    }
}
