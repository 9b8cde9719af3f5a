//! Source documents.
//!
//! The splitter only needs three things from a document: how many pages it has,
//! a way to materialize a contiguous page range as a standalone file, and the
//! file extension those files should carry. [`PdfDocument`] provides them for PDF
//! via lopdf; tests plug in lighter implementations.

use lopdf::Document;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::PipelineError;

/// A document addressable by zero-based sequential page index.
pub trait PagedDocument {
    /// Total number of pages; zero is valid.
    fn page_count(&self) -> usize;

    /// Serialize pages `pages` (zero-based, half-open) as a standalone document,
    /// preserving page order and content.
    fn extract_pages(&self, pages: Range<usize>) -> Result<Vec<u8>, PipelineError>;

    /// Extension (without the dot) used for artifacts and relocated files.
    fn extension(&self) -> &str;
}

/// A PDF loaded fully into memory.
#[derive(Debug)]
pub struct PdfDocument {
    path: PathBuf,
    doc: Document,
    /// 1-based page numbers in reading order, as lopdf numbers them.
    page_numbers: Vec<u32>,
}

impl PdfDocument {
    /// Load and parse a PDF from disk.
    pub fn open(path: &Path) -> Result<Self, PipelineError> {
        let doc = Document::load(path).map_err(|e| PipelineError::DocumentRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_document(path, doc)
    }

    /// Parse a PDF held in memory. `label` is only used in error messages.
    pub fn from_bytes(label: &Path, bytes: &[u8]) -> Result<Self, PipelineError> {
        let doc = Document::load_mem(bytes).map_err(|e| PipelineError::DocumentRead {
            path: label.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_document(label, doc)
    }

    fn from_document(path: &Path, doc: Document) -> Result<Self, PipelineError> {
        if doc.is_encrypted() {
            return Err(PipelineError::DocumentRead {
                path: path.to_path_buf(),
                reason: "document is encrypted".into(),
            });
        }
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        debug!(path = %path.display(), pages = page_numbers.len(), "loaded pdf");
        Ok(Self {
            path: path.to_path_buf(),
            doc,
            page_numbers,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PagedDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn extract_pages(&self, pages: Range<usize>) -> Result<Vec<u8>, PipelineError> {
        if pages.end > self.page_numbers.len() || pages.start > pages.end {
            return Err(PipelineError::DocumentRead {
                path: self.path.clone(),
                reason: format!(
                    "page range {}..{} outside document of {} pages",
                    pages.start,
                    pages.end,
                    self.page_numbers.len()
                ),
            });
        }

        // Start from the whole document and drop everything outside the range;
        // pruning then discards objects only the dropped pages referenced.
        let mut part = self.doc.clone();
        let drop: Vec<u32> = self
            .page_numbers
            .iter()
            .enumerate()
            .filter(|(i, _)| !pages.contains(i))
            .map(|(_, n)| *n)
            .collect();
        part.delete_pages(&drop);
        part.prune_objects();

        let mut buf = Vec::new();
        part.save_to(&mut buf).map_err(|e| PipelineError::DocumentRead {
            path: self.path.clone(),
            reason: format!("serialize pages {}..{}: {}", pages.start, pages.end, e),
        })?;
        Ok(buf)
    }

    fn extension(&self) -> &str {
        "pdf"
    }
}
