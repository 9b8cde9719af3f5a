//! Row-to-artifact correlation strategies.
//!
//! The relocator asks a [`Correlation`] which artifact a mapping row refers to and
//! never assumes an ordering itself.

use crate::mapping::MappingRow;

/// Maps a mapping row to a 1-based artifact index.
pub trait Correlation {
    /// `None` means the row has no artifact and is reported as missing.
    fn artifact_index(&self, row_index: usize, row: &MappingRow) -> Option<usize>;
}

/// Row `i` (zero-based) belongs to artifact `i + 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Positional;

impl Correlation for Positional {
    fn artifact_index(&self, row_index: usize, _row: &MappingRow) -> Option<usize> {
        Some(row_index + 1)
    }
}

/// Uses the explicit chunk number read from the mapping table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkColumn;

impl Correlation for ChunkColumn {
    fn artifact_index(&self, _row_index: usize, row: &MappingRow) -> Option<usize> {
        row.chunk_index
    }
}
