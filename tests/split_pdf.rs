//! Splitting real PDFs: chunk counts, page order and repeatability.

mod common;

use std::fs;
use std::path::Path;
use tempfile::tempdir;

use pdf_splitter::document::{PagedDocument, PdfDocument};
use pdf_splitter::splitter::{plan_chunks, split};

use common::{make_pdf, page_markers};

#[test]
fn chunk_count_is_ceiling_of_pages_over_n() {
    for total in 0..9usize {
        for n in 1..5usize {
            let chunks = plan_chunks(total, n).unwrap();
            assert_eq!(chunks.len(), total.div_ceil(n), "total={total} n={n}");
            // Contiguous, non-overlapping, covering every page.
            let mut next = 0;
            for (i, c) in chunks.iter().enumerate() {
                assert_eq!(c.index, i + 1);
                assert_eq!(c.pages.start, next);
                assert!(c.pages.len() <= n && !c.pages.is_empty());
                next = c.pages.end;
            }
            assert_eq!(next, total);
        }
    }
}

#[test]
fn concatenated_parts_reproduce_the_document() {
    let td = tempdir().unwrap();
    let doc = PdfDocument::from_bytes(Path::new("seven.pdf"), &make_pdf(7)).unwrap();

    let artifacts = split(&doc, 3, td.path()).unwrap();
    let names: Vec<_> = artifacts
        .iter()
        .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["part_1.pdf", "part_2.pdf", "part_3.pdf"]);

    let all: Vec<String> = artifacts
        .iter()
        .flat_map(|a| page_markers(&fs::read(&a.path).unwrap()))
        .collect();
    let expected: Vec<String> = (0..7).map(|i| format!("page-{i}")).collect();
    assert_eq!(all, expected);
}

#[test]
fn five_pages_by_two_gives_a_short_last_part() {
    let td = tempdir().unwrap();
    let doc = PdfDocument::from_bytes(Path::new("five.pdf"), &make_pdf(5)).unwrap();
    let artifacts = split(&doc, 2, td.path()).unwrap();

    assert_eq!(artifacts.len(), 3);
    assert_eq!(page_markers(&fs::read(&artifacts[2].path).unwrap()), ["page-4"]);
}

#[test]
fn splitting_twice_gives_identical_parts() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let bytes = make_pdf(4);
    let doc = PdfDocument::from_bytes(Path::new("four.pdf"), &bytes).unwrap();

    let a = split(&doc, 2, first.path()).unwrap();
    let b = split(&doc, 2, second.path()).unwrap();
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(fs::read(&x.path).unwrap(), fs::read(&y.path).unwrap());
    }
}

#[test]
fn zero_page_document_produces_no_parts() {
    let td = tempdir().unwrap();
    let doc = PdfDocument::from_bytes(Path::new("empty.pdf"), &make_pdf(0)).unwrap();
    assert_eq!(doc.page_count(), 0);
    let artifacts = split(&doc, 2, &td.path().join("scratch")).unwrap();
    assert!(artifacts.is_empty());
}

#[test]
fn unreadable_document_is_a_document_read_error() {
    let td = tempdir().unwrap();
    let bogus = td.path().join("not.pdf");
    fs::write(&bogus, b"definitely not a pdf").unwrap();
    let err = PdfDocument::open(&bogus).unwrap_err();
    assert_eq!(err.kind(), "document_read");
}
