//! Mapping table: one spreadsheet row per output chunk.
//!
//! The first row of the sheet is a header; the name and destination columns are
//! located by their header text. Row order is significant: under the default
//! positional correlation the first data row belongs to `part_1`, the second to
//! `part_2`, and so on.

use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::PipelineError;

/// One mapping row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    /// New file name for the chunk, without extension.
    pub target_name: String,
    /// Directory the renamed chunk is filed into.
    pub destination: PathBuf,
    /// Explicit 1-based chunk number, only read when a chunk column is configured.
    pub chunk_index: Option<usize>,
}

impl MappingRow {
    pub fn new(target_name: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            target_name: target_name.into(),
            destination: destination.into(),
            chunk_index: None,
        }
    }
}

/// Where in the workbook the mapping lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingLayout {
    pub sheet: String,
    pub name_column: String,
    pub path_column: String,
    pub chunk_column: Option<String>,
}

impl Default for MappingLayout {
    fn default() -> Self {
        Self {
            sheet: "pdf".into(),
            name_column: "B".into(),
            path_column: "C".into(),
            chunk_column: None,
        }
    }
}

/// Read the mapping rows from a workbook (xlsx, xlsm, xls, ods).
pub fn read_mapping(path: &Path, layout: &MappingLayout) -> Result<Vec<MappingRow>, PipelineError> {
    let read_err = |reason: String| PipelineError::MappingRead {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| read_err(e.to_string()))?;
    let range = workbook
        .worksheet_range(&layout.sheet)
        .map_err(|e| read_err(format!("sheet '{}': {}", layout.sheet, e)))?;

    let rows = rows_from_range(&range, layout).map_err(|e| match e {
        PipelineError::MappingRead { reason, .. } => read_err(reason),
        other => other,
    })?;
    info!(path = %path.display(), sheet = %layout.sheet, rows = rows.len(), "mapping table loaded");
    Ok(rows)
}

/// Turn a sheet range (header row first) into mapping rows.
///
/// Fully blank rows are skipped. A row with only one of the two required values is
/// rejected with [`PipelineError::MalformedRow`], naming the sheet row number.
pub fn rows_from_range(range: &Range<Data>, layout: &MappingLayout) -> Result<Vec<MappingRow>, PipelineError> {
    let mut rows = range.rows();
    let header: Vec<Option<String>> = match rows.next() {
        Some(cells) => cells.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };

    let name_idx = column_index(&header, &layout.name_column)?;
    let path_idx = column_index(&header, &layout.path_column)?;
    let chunk_idx = layout
        .chunk_column
        .as_deref()
        .map(|c| column_index(&header, c))
        .transpose()?;

    // Sheet row numbers as a spreadsheet user sees them (1-based, header included).
    let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0) + 1;

    let mut out = Vec::new();
    for (offset, cells) in rows.enumerate() {
        let sheet_row = first_row + offset + 1;
        let name = cells.get(name_idx).and_then(cell_text);
        let dest = cells.get(path_idx).and_then(cell_text);
        let chunk = chunk_idx.and_then(|i| cells.get(i)).and_then(cell_text);

        let (target_name, destination) = match (name, dest) {
            (None, None) if chunk.is_none() => {
                debug!(row = sheet_row, "skipping blank mapping row");
                continue;
            }
            (Some(n), Some(d)) => (n, PathBuf::from(d)),
            (None, _) => {
                return Err(PipelineError::MalformedRow {
                    row: sheet_row,
                    column: layout.name_column.clone(),
                });
            }
            (_, None) => {
                return Err(PipelineError::MalformedRow {
                    row: sheet_row,
                    column: layout.path_column.clone(),
                });
            }
        };

        let chunk_index = match (chunk_idx, chunk) {
            (Some(_), Some(raw)) => Some(parse_chunk_index(&raw).ok_or_else(|| PipelineError::MappingRead {
                path: PathBuf::new(),
                reason: format!("row {sheet_row}: chunk value '{raw}' is not a positive integer"),
            })?),
            _ => None,
        };

        out.push(MappingRow {
            target_name,
            destination,
            chunk_index,
        });
    }
    Ok(out)
}

fn column_index(header: &[Option<String>], name: &str) -> Result<usize, PipelineError> {
    header
        .iter()
        .position(|h| h.as_deref().is_some_and(|h| h.eq_ignore_ascii_case(name.trim())))
        .ok_or_else(|| PipelineError::MappingRead {
            path: PathBuf::new(),
            reason: format!("no column named '{name}' in the header row"),
        })
}

fn parse_chunk_index(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Cell contents as trimmed text; `None` for empty cells.
/// Whole floats lose their trailing `.0` so a numeric name `1001` stays `1001`.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[&[&str]]) -> Range<Data> {
        let rows = cells.len() as u32;
        let cols = cells.iter().map(|r| r.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (rows - 1, cols - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    range.set_value((r as u32, c as u32), Data::String(value.to_string()));
                }
            }
        }
        range
    }

    #[test]
    fn reads_rows_by_header_in_order() {
        let range = sheet(&[
            &["A", "B", "C"],
            &["x", "Invoice_A", "/out/a"],
            &["y", "Invoice_B", "/out/b"],
        ]);
        let rows = rows_from_range(&range, &MappingLayout::default()).unwrap();
        assert_eq!(
            rows,
            vec![MappingRow::new("Invoice_A", "/out/a"), MappingRow::new("Invoice_B", "/out/b")]
        );
    }

    #[test]
    fn blank_rows_are_skipped() {
        let range = sheet(&[&["B", "C"], &["one", "/a"], &["", ""], &["two", "/b"], &["", ""]]);
        let rows = rows_from_range(&range, &MappingLayout::default()).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.target_name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn half_filled_row_is_rejected_with_its_sheet_row() {
        let range = sheet(&[&["B", "C"], &["one", "/a"], &["two", ""]]);
        let err = rows_from_range(&range, &MappingLayout::default()).unwrap_err();
        match err {
            PipelineError::MalformedRow { row, column } => {
                assert_eq!(row, 3);
                assert_eq!(column, "C");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_header_column_is_a_read_error() {
        let range = sheet(&[&["Name", "Folder"], &["one", "/a"]]);
        let err = rows_from_range(&range, &MappingLayout::default()).unwrap_err();
        assert!(err.to_string().contains("no column named 'B'"), "{err}");
    }

    #[test]
    fn chunk_column_is_parsed_when_configured() {
        let range = sheet(&[&["B", "C", "Part"], &["one", "/a", "2"], &["two", "/b", "1"]]);
        let layout = MappingLayout {
            chunk_column: Some("part".into()),
            ..MappingLayout::default()
        };
        let rows = rows_from_range(&range, &layout).unwrap();
        assert_eq!(rows[0].chunk_index, Some(2));
        assert_eq!(rows[1].chunk_index, Some(1));

        let bad = sheet(&[&["B", "C", "Part"], &["one", "/a", "zero"]]);
        assert!(rows_from_range(&bad, &layout).is_err());
    }

    #[test]
    fn numeric_cells_render_without_fraction() {
        assert_eq!(cell_text(&Data::Float(1001.0)).as_deref(), Some("1001"));
        assert_eq!(cell_text(&Data::Float(1.5)).as_deref(), Some("1.5"));
        assert_eq!(cell_text(&Data::Int(7)).as_deref(), Some("7"));
        assert_eq!(cell_text(&Data::String("  ".into())), None);
    }

    #[test]
    fn missing_workbook_is_a_read_error() {
        let err = read_mapping(Path::new("/definitely/not/here.xlsx"), &MappingLayout::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MappingRead { .. }));
    }
}
