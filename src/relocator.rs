//! Relocation of split artifacts according to the mapping table.
//!
//! Rows are processed strictly in order. Each row resolves its artifact through the
//! configured [`Correlation`], makes sure the destination directory exists (asking
//! the [`FolderConfirmer`] when it does not), copies the artifact under its new name,
//! verifies the copy and only then removes the artifact from the scratch area.
//!
//! A failing row is recorded and the batch moves on; nothing here aborts the loop
//! except a shutdown request, which stops before the next row starts.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::confirm::FolderConfirmer;
use crate::correlate::{Correlation, Positional};
use crate::errors::PipelineError;
use crate::fs_ops::copy_verified;
use crate::mapping::MappingRow;
use crate::shutdown;
use crate::splitter::artifact_file_name;

/// What happened to one mapping row.
#[derive(Debug)]
pub enum RelocationOutcome {
    /// Copied, verified and removed from scratch.
    Moved,
    /// No artifact exists for this row.
    SkippedMissingArtifact,
    /// The destination directory was missing and creating it was declined.
    SkippedUserDeclinedFolder,
    /// The row failed; its artifact (if any) was left in place.
    Failed(PipelineError),
}

/// Per-row record, in mapping order.
#[derive(Debug)]
pub struct RowOutcome {
    /// Zero-based mapping row position.
    pub row: usize,
    /// Artifact the row was correlated with, if any.
    pub artifact: Option<PathBuf>,
    /// Final file path the artifact was (or would have been) copied to.
    pub destination: PathBuf,
    /// The destination directory was created for this row.
    pub folder_created: bool,
    pub outcome: RelocationOutcome,
}

impl RowOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self.outcome, RelocationOutcome::Moved)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, RelocationOutcome::Failed(_))
    }
}

/// Result of one relocation pass.
#[derive(Debug, Default)]
pub struct RelocationReport {
    pub rows: Vec<RowOutcome>,
    /// A shutdown request stopped the pass before every row was handled.
    pub interrupted: bool,
}

enum FolderState {
    Ready { created: bool },
    Declined,
}

pub struct Relocator<'a> {
    scratch_dir: PathBuf,
    extension: String,
    correlation: Box<dyn Correlation + 'a>,
    confirmer: &'a mut dyn FolderConfirmer,
    stop_requested: fn() -> bool,
    declined: HashSet<PathBuf>,
}

impl<'a> Relocator<'a> {
    /// Relocator over `scratch_dir` using positional correlation.
    pub fn new(scratch_dir: impl Into<PathBuf>, extension: impl Into<String>, confirmer: &'a mut dyn FolderConfirmer) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            extension: extension.into(),
            correlation: Box::new(Positional),
            confirmer,
            stop_requested: shutdown::is_requested,
            declined: HashSet::new(),
        }
    }

    pub fn with_correlation(mut self, correlation: impl Correlation + 'a) -> Self {
        self.correlation = Box::new(correlation);
        self
    }

    /// Replace the shutdown check consulted between rows.
    pub fn with_stop_check(mut self, stop_requested: fn() -> bool) -> Self {
        self.stop_requested = stop_requested;
        self
    }

    /// Process every row in order; one outcome per handled row.
    pub fn relocate(&mut self, rows: &[MappingRow]) -> RelocationReport {
        let mut report = RelocationReport::default();
        for (i, row) in rows.iter().enumerate() {
            if (self.stop_requested)() {
                warn!(row = i, remaining = rows.len() - i, "shutdown requested; stopping relocation");
                report.interrupted = true;
                break;
            }
            let outcome = self.relocate_row(i, row);
            log_outcome(&outcome);
            report.rows.push(outcome);
        }
        report
    }

    fn relocate_row(&mut self, i: usize, row: &MappingRow) -> RowOutcome {
        let destination = row.destination.join(artifact_target_name(&row.target_name, &self.extension));
        let artifact = self
            .correlation
            .artifact_index(i, row)
            .map(|n| self.scratch_dir.join(artifact_file_name(n, &self.extension)));
        let mut record = RowOutcome {
            row: i,
            artifact: artifact.clone(),
            destination,
            folder_created: false,
            outcome: RelocationOutcome::SkippedMissingArtifact,
        };

        let Some(artifact) = artifact.filter(|p| p.is_file()) else {
            return record;
        };

        if let Err(e) = validate_target_name(&row.target_name) {
            record.outcome = RelocationOutcome::Failed(e);
            return record;
        }

        match self.ensure_folder(&row.destination) {
            Ok(FolderState::Ready { created }) => record.folder_created = created,
            Ok(FolderState::Declined) => {
                record.outcome = RelocationOutcome::SkippedUserDeclinedFolder;
                return record;
            }
            Err(e) => {
                record.outcome = RelocationOutcome::Failed(e);
                return record;
            }
        }

        record.outcome = match move_verified(&artifact, &record.destination) {
            Ok(()) => RelocationOutcome::Moved,
            Err(e) => RelocationOutcome::Failed(e),
        };
        record
    }

    /// Make sure `dir` exists, asking once per distinct missing directory.
    fn ensure_folder(&mut self, dir: &Path) -> Result<FolderState, PipelineError> {
        match fs::metadata(dir) {
            Ok(m) if m.is_dir() => return Ok(FolderState::Ready { created: false }),
            Ok(_) => {
                return Err(PipelineError::RelocationWrite {
                    op: "use destination directory",
                    path: dir.to_path_buf(),
                    source: io::Error::other("exists but is not a directory"),
                });
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(PipelineError::relocation_write("stat destination directory", dir)(e)),
        }

        if self.declined.contains(dir) {
            debug!(dir = %dir.display(), "folder creation already declined");
            return Ok(FolderState::Declined);
        }
        if !self.confirmer.confirm_create_folder(dir) {
            self.declined.insert(dir.to_path_buf());
            return Ok(FolderState::Declined);
        }

        fs::create_dir_all(dir).map_err(PipelineError::relocation_write("create destination directory", dir))?;
        info!(dir = %dir.display(), "created destination directory");
        Ok(FolderState::Ready { created: true })
    }
}

/// Copy, verify, then delete the source. The source survives any failure before
/// the delete.
fn move_verified(artifact: &Path, destination: &Path) -> Result<(), PipelineError> {
    copy_verified(artifact, destination)?;
    fs::remove_file(artifact).map_err(PipelineError::relocation_write("remove original artifact", artifact))
}

fn artifact_target_name(target_name: &str, extension: &str) -> String {
    if extension.is_empty() {
        target_name.to_string()
    } else {
        format!("{target_name}.{extension}")
    }
}

/// Target names become file names; anything that could escape the destination
/// directory is refused.
fn validate_target_name(name: &str) -> Result<(), PipelineError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        Err(PipelineError::InvalidTargetName(name.to_string()))
    } else {
        Ok(())
    }
}

fn log_outcome(o: &RowOutcome) {
    let artifact = o
        .artifact
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<none>".into());
    match &o.outcome {
        RelocationOutcome::Moved => info!(
            row = o.row,
            %artifact,
            dest = %o.destination.display(),
            folder_created = o.folder_created,
            "moved"
        ),
        RelocationOutcome::SkippedMissingArtifact => {
            warn!(row = o.row, %artifact, "artifact not found; row skipped")
        }
        RelocationOutcome::SkippedUserDeclinedFolder => warn!(
            row = o.row,
            %artifact,
            dir = %o.destination.parent().unwrap_or(Path::new("")).display(),
            "folder creation declined; row skipped"
        ),
        RelocationOutcome::Failed(e) => error!(
            row = o.row,
            %artifact,
            code = e.code(),
            kind = e.kind(),
            error = %e,
            "relocation failed"
        ),
    }
}
