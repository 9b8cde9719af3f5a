//! Whole cycles over in-memory PDFs: relocation outcomes and scratch cleanup.

mod common;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use pdf_splitter::confirm::{AlwaysCreate, FolderConfirmer, NeverCreate};
use pdf_splitter::document::PdfDocument;
use pdf_splitter::pipeline::run_with;
use pdf_splitter::relocator::RelocationOutcome;
use pdf_splitter::MappingRow;

use common::{make_pdf, page_markers};

/// Accepts every folder and records each question.
#[derive(Default)]
struct Recording(Vec<PathBuf>);

impl FolderConfirmer for Recording {
    fn confirm_create_folder(&mut self, path: &Path) -> bool {
        self.0.push(path.to_path_buf());
        true
    }
}

fn pdf(pages: usize) -> PdfDocument {
    PdfDocument::from_bytes(Path::new("fixture.pdf"), &make_pdf(pages)).unwrap()
}

#[test]
fn existing_destination_folder_is_used_without_asking() {
    let td = tempdir().unwrap();
    let dest = td.path().join("filed");
    fs::create_dir_all(&dest).unwrap();
    let rows = vec![MappingRow::new("Report", &dest)];
    let mut confirmer = Recording::default();

    let report = run_with(&pdf(2), &rows, 2, &td.path().join("scratch"), false, &mut confirmer).unwrap();

    assert_eq!(report.moved(), 1);
    assert!(confirmer.0.is_empty());
    assert!(!report.rows[0].folder_created);
    assert_eq!(page_markers(&fs::read(dest.join("Report.pdf")).unwrap()), ["page-0", "page-1"]);
}

#[test]
fn shared_missing_folder_is_asked_about_once() {
    let td = tempdir().unwrap();
    let dest = td.path().join("shared");
    let rows = vec![MappingRow::new("One", &dest), MappingRow::new("Two", &dest)];
    let mut confirmer = Recording::default();

    let report = run_with(&pdf(4), &rows, 2, &td.path().join("scratch"), false, &mut confirmer).unwrap();

    assert_eq!(report.moved(), 2);
    assert_eq!(confirmer.0, vec![dest.clone()]);
    assert!(dest.join("One.pdf").is_file());
    assert!(dest.join("Two.pdf").is_file());
}

#[test]
fn declined_folders_skip_rows_and_parts_are_discarded() {
    let td = tempdir().unwrap();
    let scratch = td.path().join("scratch");
    let missing = td.path().join("never");
    let rows = vec![MappingRow::new("A", &missing)];

    let report = run_with(&pdf(3), &rows, 1, &scratch, false, &mut NeverCreate).unwrap();

    assert!(matches!(report.rows[0].outcome, RelocationOutcome::SkippedUserDeclinedFolder));
    assert!(!missing.exists());
    assert_eq!(report.unprocessed.len(), 3);
    assert!(!scratch.exists());
}

#[test]
fn more_rows_than_parts_skips_the_extra_rows() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    let rows = vec![
        MappingRow::new("First", &out),
        MappingRow::new("Second", &out),
        MappingRow::new("Third", &out),
    ];

    let report = run_with(&pdf(3), &rows, 2, &td.path().join("scratch"), false, &mut AlwaysCreate).unwrap();

    assert_eq!(report.moved(), 2);
    assert_eq!(report.skipped(), 1);
    assert!(matches!(report.rows[2].outcome, RelocationOutcome::SkippedMissingArtifact));
    assert!(report.unprocessed.is_empty());
}

#[test]
fn a_failed_row_does_not_stop_later_rows() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    let rows = vec![MappingRow::new("../escape", &out), MappingRow::new("Kept", &out)];

    let report = run_with(&pdf(4), &rows, 2, &td.path().join("scratch"), false, &mut AlwaysCreate).unwrap();

    assert_eq!(report.failed(), 1);
    assert_eq!(report.moved(), 1);
    assert_eq!(page_markers(&fs::read(out.join("Kept.pdf")).unwrap()), ["page-2", "page-3"]);
    // The unfiled first part is reported, then removed with the scratch area.
    assert_eq!(report.unprocessed.len(), 1);
    assert!(report.unprocessed[0].ends_with("part_1.pdf"));
}

#[test]
fn existing_target_file_is_overwritten() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("Invoice.pdf"), b"old contents").unwrap();
    let rows = vec![MappingRow::new("Invoice", &out)];

    let report = run_with(&pdf(1), &rows, 1, &td.path().join("scratch"), false, &mut AlwaysCreate).unwrap();

    assert_eq!(report.moved(), 1);
    assert_eq!(page_markers(&fs::read(out.join("Invoice.pdf")).unwrap()), ["page-0"]);
}

#[test]
fn keyed_rows_pick_their_part_by_number() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    let mut last = MappingRow::new("Last", &out);
    last.chunk_index = Some(3);
    let mut first = MappingRow::new("First", &out);
    first.chunk_index = Some(1);
    let rows = vec![last, first];

    let report = run_with(&pdf(6), &rows, 2, &td.path().join("scratch"), true, &mut AlwaysCreate).unwrap();

    assert_eq!(report.moved(), 2);
    assert_eq!(page_markers(&fs::read(out.join("Last.pdf")).unwrap()), ["page-4", "page-5"]);
    assert_eq!(page_markers(&fs::read(out.join("First.pdf")).unwrap()), ["page-0", "page-1"]);
    assert_eq!(report.unprocessed.len(), 1);
    assert!(report.unprocessed[0].ends_with("part_2.pdf"));
}

#[test]
fn residue_from_an_earlier_run_never_reaches_a_destination() {
    let td = tempdir().unwrap();
    let scratch = td.path().join("scratch");
    fs::create_dir_all(&scratch).unwrap();
    fs::write(scratch.join("part_2.pdf"), b"stale part").unwrap();
    let out = td.path().join("out");
    let rows = vec![MappingRow::new("A", &out), MappingRow::new("B", &out)];

    // One page only, so no fresh part_2 is produced.
    let report = run_with(&pdf(1), &rows, 1, &scratch, false, &mut AlwaysCreate).unwrap();

    assert_eq!(report.moved(), 1);
    assert!(matches!(report.rows[1].outcome, RelocationOutcome::SkippedMissingArtifact));
    assert!(!out.join("B.pdf").exists());
}
