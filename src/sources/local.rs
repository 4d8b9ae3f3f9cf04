//! Local file system document source.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::IngestError;
use crate::models::Document;
use crate::utils::file::{is_txt_file, read_file_content};

/// Outcome of one directory scan.
#[derive(Debug)]
pub struct ReadOutcome {
    pub documents: Vec<Document>,
    /// Eligible files dropped because their trimmed content was empty.
    pub files_skipped: u64,
}

/// Reads eligible `.txt` files from a directory and turns them into
/// documents.
#[derive(Debug, Clone)]
pub struct DocumentReader {
    /// Maximum file size accepted, in bytes.
    max_file_size: u64,
}

impl DocumentReader {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Read every `.txt` file directly inside `directory`.
    ///
    /// Files whose trimmed content is empty are skipped with a warning
    /// and counted in the outcome. Returns documents in
    /// directory-listing order, which is not stable across platforms.
    /// Fails with [`IngestError::NoValidDocuments`] when nothing remains
    /// after filtering.
    pub fn read_all(&self, directory: &Path) -> Result<ReadOutcome, IngestError> {
        let mut documents = Vec::new();
        let mut files_skipped = 0u64;

        for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| IngestError::FileReadError {
                path: directory.to_path_buf(),
                source: std::io::Error::other(e),
            })?;
            let path = entry.path();

            if !path.is_file() || !is_txt_file(path) {
                continue;
            }

            let text = read_file_content(path, self.max_file_size).map_err(|source| {
                IngestError::FileReadError {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

            if text.trim().is_empty() {
                eprintln!("Warning: skipping empty file {}", path.display());
                files_skipped += 1;
                continue;
            }

            documents.push(Document::new(file_name_of(path), text));
        }

        if documents.is_empty() {
            return Err(IngestError::NoValidDocuments(directory.to_path_buf()));
        }

        Ok(ReadOutcome {
            documents,
            files_skipped,
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
