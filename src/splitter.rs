//! Page-range partitioning.
//!
//! A cursor walks `[0, total)` in steps of `pages_per_split`; every step becomes one
//! chunk with a 1-based index, and every chunk is written to the scratch directory as
//! `part_{index}.{ext}`. Files are written through a temp sibling and renamed, so a
//! failed split never leaves a partially written artifact behind.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::document::PagedDocument;
use crate::errors::PipelineError;
use crate::fs_ops::write_file_atomic;

/// One contiguous page range of the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpec {
    /// 1-based position in split order.
    pub index: usize,
    /// Zero-based, half-open page range.
    pub pages: Range<usize>,
}

/// A chunk persisted to the scratch area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub chunk: ChunkSpec,
    pub path: PathBuf,
}

/// File name for the artifact with `index`; a pure function of its inputs.
pub fn artifact_file_name(index: usize, extension: &str) -> String {
    if extension.is_empty() {
        format!("part_{index}")
    } else {
        format!("part_{index}.{extension}")
    }
}

/// Plan the chunks for a document of `total` pages.
pub fn plan_chunks(total: usize, pages_per_split: usize) -> Result<Vec<ChunkSpec>, PipelineError> {
    if pages_per_split == 0 {
        return Err(PipelineError::Configuration(
            "pages per split must be a positive integer (got 0)".into(),
        ));
    }

    Ok((0..total)
        .step_by(pages_per_split)
        .enumerate()
        .map(|(i, start)| ChunkSpec {
            index: i + 1,
            pages: start..(start + pages_per_split).min(total),
        })
        .collect())
}

/// Split `document` into artifacts inside `scratch_dir` (created if absent).
pub fn split(
    document: &dyn PagedDocument,
    pages_per_split: usize,
    scratch_dir: &Path,
) -> Result<Vec<OutputArtifact>, PipelineError> {
    let chunks = plan_chunks(document.page_count(), pages_per_split)?;

    fs::create_dir_all(scratch_dir)
        .map_err(PipelineError::scratch_write("create scratch directory", scratch_dir))?;

    let mut artifacts = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let bytes = document.extract_pages(chunk.pages.clone())?;
        let path = scratch_dir.join(artifact_file_name(chunk.index, document.extension()));
        write_file_atomic(&path, &bytes).map_err(PipelineError::scratch_write("write artifact", &path))?;
        debug!(
            index = chunk.index,
            start = chunk.pages.start,
            end = chunk.pages.end,
            path = %path.display(),
            "wrote artifact"
        );
        artifacts.push(OutputArtifact { chunk, path });
    }

    info!(
        artifacts = artifacts.len(),
        pages = document.page_count(),
        pages_per_split,
        scratch = %scratch_dir.display(),
        "split complete"
    );
    Ok(artifacts)
}
