//! Typed error definitions for pdf_splitter.
//! Fatal variants abort a whole cycle; the relocation variants are recorded per row.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::describe_io;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Cannot read document {path}: {reason}")]
    DocumentRead { path: PathBuf, reason: String },

    #[error("Cannot read mapping table {path}: {reason}")]
    MappingRead { path: PathBuf, reason: String },

    #[error("Mapping row {row} is missing its '{column}' value")]
    MalformedRow { row: usize, column: String },

    #[error("{}", describe_io(.op, .path, .source))]
    ScratchWrite {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Scratch area {0} is in use by another run")]
    ScratchLocked(PathBuf),

    #[error("{}", describe_io(.op, .path, .source))]
    RelocationWrite {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Copy to {dest} could not be verified: expected {expected} bytes, found {actual}")]
    CopyVerification {
        dest: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("Target name {0:?} is not a plain file name")]
    InvalidTargetName(String),

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl PipelineError {
    /// Stable numeric code for structured logs and exit statuses.
    pub fn code(&self) -> u16 {
        match self {
            PipelineError::Configuration(_) => 10,
            PipelineError::DocumentRead { .. } => 20,
            PipelineError::MappingRead { .. } => 21,
            PipelineError::MalformedRow { .. } => 22,
            PipelineError::ScratchWrite { .. } => 30,
            PipelineError::ScratchLocked(_) => 31,
            PipelineError::RelocationWrite { .. } => 40,
            PipelineError::CopyVerification { .. } => 41,
            PipelineError::InvalidTargetName(_) => 42,
            PipelineError::Interrupted => 130,
        }
    }

    /// Short machine-friendly kind, used as the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "configuration",
            PipelineError::DocumentRead { .. } => "document_read",
            PipelineError::MappingRead { .. } => "mapping_read",
            PipelineError::MalformedRow { .. } => "malformed_row",
            PipelineError::ScratchWrite { .. } => "scratch_write",
            PipelineError::ScratchLocked(_) => "scratch_locked",
            PipelineError::RelocationWrite { .. } => "relocation_write",
            PipelineError::CopyVerification { .. } => "copy_verification",
            PipelineError::InvalidTargetName(_) => "invalid_target_name",
            PipelineError::Interrupted => "interrupted",
        }
    }

    /// True for errors that end the cycle rather than a single row.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PipelineError::RelocationWrite { .. }
                | PipelineError::CopyVerification { .. }
                | PipelineError::InvalidTargetName(_)
        )
    }

    pub(crate) fn scratch_write(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| PipelineError::ScratchWrite { op, path, source }
    }

    pub(crate) fn relocation_write(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| PipelineError::RelocationWrite { op, path, source }
    }
}
