pub mod loader;
pub mod splitter;

use docqa_types::SourceKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file in the watched folder that the loader can handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub file_name: String,
    pub kind: SourceKind,
}

/// List `.txt` and `.pdf` files directly inside `doc_dir`, sorted by name.
///
/// Subdirectories and other extensions are ignored. Dot-files are candidates
/// like any other file.
pub fn list_candidates(doc_dir: &Path) -> std::io::Result<Vec<Candidate>> {
    if !doc_dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("folder {} does not exist", doc_dir.display()),
        ));
    }

    let mut candidates: Vec<Candidate> = WalkDir::new(doc_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let file_name = e.file_name().to_str()?.to_string();
            let kind = SourceKind::from_path(e.path())?;
            Some(Candidate {
                path: e.into_path(),
                file_name,
                kind,
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_candidates_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "n").unwrap();
        fs::write(dir.path().join("report.PDF"), "p").unwrap();
        fs::write(dir.path().join("image.png"), "i").unwrap();
        fs::write(dir.path().join(".hidden.txt"), "h").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/inner.txt"), "x").unwrap();

        let candidates = list_candidates(dir.path()).unwrap();
        let names: Vec<&str> = candidates.iter().map(|c| c.file_name.as_str()).collect();
        assert_eq!(names, vec![".hidden.txt", "notes.txt", "report.PDF"]);
        assert_eq!(candidates[1].kind, SourceKind::Text);
        assert_eq!(candidates[2].kind, SourceKind::Pdf);
    }

    #[test]
    fn test_list_candidates_missing_folder() {
        let dir = TempDir::new().unwrap();
        let err = list_candidates(&dir.path().join("doc")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
