//! One split-and-relocate cycle.
//!
//! Order: validate settings, read the mapping table, open the document, prepare the
//! scratch area, split, relocate, record what was never relocated, purge. The scratch
//! guard lives for the whole split/relocate span, so the directory is gone when this
//! returns, whether it returns a report or an error. A failed purge after relocation
//! is recorded on the report instead of replacing it.

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::confirm::FolderConfirmer;
use crate::correlate::ChunkColumn;
use crate::document::{PagedDocument, PdfDocument};
use crate::errors::PipelineError;
use crate::mapping::{MappingLayout, MappingRow, read_mapping};
use crate::relocator::{RelocationOutcome, Relocator, RowOutcome};
use crate::scratch::ScratchArea;
use crate::splitter::{OutputArtifact, split};

/// Everything one cycle needs; nothing is read from ambient state.
#[derive(Debug, Clone)]
pub struct CycleRequest {
    pub document: PathBuf,
    pub mapping: PathBuf,
    pub layout: MappingLayout,
    /// Signed so that user input can be validated rather than wrapped.
    pub pages_per_split: i64,
    pub scratch_dir: PathBuf,
}

/// Outcome of a completed cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub artifacts: Vec<OutputArtifact>,
    pub rows: Vec<RowOutcome>,
    /// Artifacts no row relocated; they were removed with the scratch area.
    pub unprocessed: Vec<PathBuf>,
    pub interrupted: bool,
    /// Removing the scratch area failed after relocation; row outcomes still stand.
    pub purge_error: Option<PipelineError>,
}

impl CycleReport {
    pub fn moved(&self) -> usize {
        self.rows.iter().filter(|r| r.is_moved()).count()
    }

    pub fn failed(&self) -> usize {
        self.rows.iter().filter(|r| r.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    RelocationOutcome::SkippedMissingArtifact | RelocationOutcome::SkippedUserDeclinedFolder
                )
            })
            .count()
    }
}

/// Reject a non-positive page count before anything touches the disk.
pub fn validate_pages_per_split(n: i64) -> Result<usize, PipelineError> {
    if n <= 0 {
        return Err(PipelineError::Configuration(format!(
            "pages per split must be a positive integer (got {n})"
        )));
    }
    usize::try_from(n).map_err(|_| PipelineError::Configuration(format!("pages per split {n} is too large")))
}

/// Run a full cycle from file paths.
pub fn run_cycle(request: &CycleRequest, confirmer: &mut dyn FolderConfirmer) -> Result<CycleReport, PipelineError> {
    let pages_per_split = validate_pages_per_split(request.pages_per_split)?;
    let rows = read_mapping(&request.mapping, &request.layout)?;
    let document = PdfDocument::open(&request.document)?;
    info!(
        document = %request.document.display(),
        mapping = %request.mapping.display(),
        rows = rows.len(),
        pages = document.page_count(),
        "starting cycle"
    );
    let keyed = request.layout.chunk_column.is_some();
    run_with(&document, &rows, pages_per_split, &request.scratch_dir, keyed, confirmer)
}

/// Run a cycle over an already opened document and mapping.
pub fn run_with(
    document: &dyn PagedDocument,
    rows: &[MappingRow],
    pages_per_split: usize,
    scratch_dir: &Path,
    keyed: bool,
    confirmer: &mut dyn FolderConfirmer,
) -> Result<CycleReport, PipelineError> {
    let scratch = ScratchArea::prepare(scratch_dir)?;
    let artifacts = split(document, pages_per_split, scratch.path())?;

    let mut relocator = Relocator::new(scratch.path(), document.extension(), confirmer);
    if keyed {
        relocator = relocator.with_correlation(ChunkColumn);
    }
    let relocation = relocator.relocate(rows);

    let unprocessed = scratch.leftover_artifacts();
    for path in &unprocessed {
        warn!(artifact = %path.display(), "artifact was not relocated and will be discarded");
    }
    let purge_error = scratch.purge().err();
    if let Some(e) = &purge_error {
        error!(code = e.code(), kind = e.kind(), error = %e, "scratch area could not be removed");
    }

    let report = CycleReport {
        artifacts,
        rows: relocation.rows,
        unprocessed,
        interrupted: relocation.interrupted,
        purge_error,
    };
    info!(
        moved = report.moved(),
        skipped = report.skipped(),
        failed = report.failed(),
        unprocessed = report.unprocessed.len(),
        "cycle finished"
    );
    Ok(report)
}
