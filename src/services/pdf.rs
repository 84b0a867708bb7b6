//! PDF Documents
//!
//! Lists the spec-sheet PDFs of the dataset directory and turns them into
//! the plain text handed to the model.

use std::path::{Component, Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Maximum file size for PDF parsing (50MB)
const MAX_DOC_SIZE: u64 = 50 * 1024 * 1024;

/// Source of dataset documents.
///
/// Filenames are bare names relative to the dataset, never paths.
pub trait DocumentReader: Send + Sync {
    /// Names of all PDFs in the dataset, sorted
    fn list_documents(&self) -> AppResult<Vec<String>>;

    /// Text of one document, prefixed with a `Filename:` line
    fn read_document(&self, filename: &str) -> AppResult<String>;
}

/// Build the text the model sees for a document.
pub fn document_text<S: AsRef<str>>(filename: &str, pages: &[S]) -> String {
    let body = pages
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    format!("Filename: {}\n{}", filename, body)
}

/// Reads PDFs from a directory with `pdf-extract`
#[derive(Debug, Clone)]
pub struct PdfDirectoryReader {
    dataset_dir: PathBuf,
}

impl PdfDirectoryReader {
    pub fn new(dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset_dir: dataset_dir.into(),
        }
    }

    /// Resolve a bare filename inside the dataset directory.
    ///
    /// Anything that looks like a path is treated as missing.
    fn resolve(&self, filename: &str) -> AppResult<PathBuf> {
        let mut components = Path::new(filename).components();
        let is_bare = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) && !filename.contains('\\');
        if !is_bare {
            return Err(AppError::not_found(format!("document {}", filename)));
        }

        let path = self.dataset_dir.join(filename);
        if !path.is_file() {
            return Err(AppError::not_found(format!("document {}", filename)));
        }
        Ok(path)
    }
}

/// Check file size against a limit
fn check_file_size(path: &Path, max_size: u64) -> AppResult<u64> {
    let size = std::fs::metadata(path)?.len();
    if size > max_size {
        return Err(AppError::pdf(format!(
            "File too large: {:.1} MB (max {:.1} MB)",
            size as f64 / (1024.0 * 1024.0),
            max_size as f64 / (1024.0 * 1024.0)
        )));
    }
    Ok(size)
}

impl DocumentReader for PdfDirectoryReader {
    fn list_documents(&self) -> AppResult<Vec<String>> {
        let pattern = self
            .dataset_dir
            .join("*.pdf")
            .to_string_lossy()
            .into_owned();
        let escaped = format!(
            "{}{}*.pdf",
            glob::Pattern::escape(&self.dataset_dir.to_string_lossy()),
            std::path::MAIN_SEPARATOR
        );

        let entries = glob::glob(&escaped)
            .map_err(|e| AppError::config(format!("Invalid dataset pattern {}: {}", pattern, e)))?;

        let mut names = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        names.push(name.to_string());
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable dataset entry");
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_document(&self, filename: &str) -> AppResult<String> {
        let path = self.resolve(filename)?;
        check_file_size(&path, MAX_DOC_SIZE)?;

        // pdf-extract can panic on malformed fonts or streams instead of
        // returning an error
        let text = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text(&path)
        }))
        .map_err(|_| AppError::pdf(format!("PDF parser panicked on {}", filename)))?
        .map_err(|e| AppError::pdf(format!("Failed to extract text from {}: {}", filename, e)))?;

        // pdf-extract separates pages with form feeds
        let pages: Vec<&str> = text.split('\x0c').collect();
        tracing::debug!(filename = %filename, pages = pages.len(), "Extracted PDF text");

        Ok(document_text(filename, &pages))
    }
}
