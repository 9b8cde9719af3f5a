use std::io;
use std::path::Path;

use pdf_splitter::fs_ops::{describe_io, io_error_with_help};
use pdf_splitter::PipelineError;

#[test]
fn notfound_includes_op_path_and_hint() {
    let p = Path::new("/nonexistent/dest/folder");
    let err = io_error_with_help("create folder", p)(io::Error::from(io::ErrorKind::NotFound));
    let msg = format!("{}", err);
    assert!(msg.contains("create folder"), "{msg}");
    assert!(msg.contains("/nonexistent/dest/folder"), "{msg}");
    assert!(msg.contains("path not found"), "{msg}");
}

#[cfg(unix)]
#[test]
fn read_only_filesystem_hint() {
    let msg = describe_io("copy", Path::new("/mnt/ro"), &io::Error::from_raw_os_error(libc::EROFS));
    assert!(msg.contains("read-only"), "{msg}");
}

#[test]
fn codes_and_kinds_are_stable() {
    let cases = [
        (PipelineError::Configuration("x".into()), 10, "configuration"),
        (PipelineError::InvalidTargetName("a/b".into()), 42, "invalid_target_name"),
        (PipelineError::Interrupted, 130, "interrupted"),
    ];
    for (e, code, kind) in cases {
        assert_eq!(e.code(), code);
        assert_eq!(e.kind(), kind);
    }
}

#[test]
fn only_relocation_errors_are_per_row() {
    assert!(!PipelineError::InvalidTargetName("..".into()).is_fatal());
    assert!(
        !PipelineError::CopyVerification {
            dest: "/d/x.pdf".into(),
            expected: 10,
            actual: 3
        }
        .is_fatal()
    );
    assert!(PipelineError::ScratchLocked("/tmp/s".into()).is_fatal());
    assert!(
        PipelineError::MalformedRow {
            row: 3,
            column: "C".into()
        }
        .is_fatal()
    );
}
