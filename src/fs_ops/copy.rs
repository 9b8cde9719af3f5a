//! Copy helpers used by the splitter and relocator.
//! - Data is written to a temp file next to the destination, fsynced, then renamed
//!   over the final name, so readers never observe a half-written file.
//! - `copy_verified` checks the temp copy's size against the source before the rename;
//!   callers only delete the source after that check passes.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, trace};

use crate::errors::PipelineError;

use super::atomic::replace_file;
use super::meta::preserve_times;
use super::{io_copy, util};

/// Write `bytes` to `dest` through a temp sibling. Overwrites an existing `dest`.
pub fn write_file_atomic(dest: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let tmp = util::unique_temp_path(dir);

    if let Err(e) = io_copy::write_new(&tmp, bytes).and_then(|()| replace_file(&tmp, dest)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

/// Copy `src` to `dest` (overwriting), then confirm the copy landed intact.
/// Returns the verified byte count.
pub fn copy_verified(src: &Path, dest: &Path) -> Result<u64, PipelineError> {
    let src_meta = fs::metadata(src).map_err(PipelineError::relocation_write("stat artifact", src))?;
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let tmp = util::unique_temp_path(dir);

    let copied = io_copy::copy_streaming(src, &tmp).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        PipelineError::relocation_write("copy artifact", &tmp)(e)
    })?;
    trace!(src = %src.display(), tmp = %tmp.display(), bytes = copied, "copied to temp");

    land_verified(&tmp, dest, src_meta.len())?;
    preserve_times(dest, &src_meta);
    debug!(src = %src.display(), dest = %dest.display(), bytes = copied, "copy verified");
    Ok(copied)
}

/// Check the temp copy, then rename it onto `dest`. An unverified copy is discarded
/// and never replaces an existing `dest`.
pub(crate) fn land_verified(tmp: &Path, dest: &Path, expected: u64) -> Result<(), PipelineError> {
    if let Err(e) = verify_copy(tmp, expected, dest) {
        let _ = fs::remove_file(tmp);
        return Err(e);
    }
    if let Err(e) = replace_file(tmp, dest) {
        let _ = fs::remove_file(tmp);
        return Err(PipelineError::relocation_write("rename into destination", dest)(e));
    }
    Ok(())
}

/// `landed` must exist and match the expected length; errors name `dest`.
pub(crate) fn verify_copy(landed: &Path, expected: u64, dest: &Path) -> Result<(), PipelineError> {
    let actual = fs::metadata(landed).ok().filter(|m| m.is_file()).map(|m| m.len());
    match actual {
        Some(actual) if actual == expected => Ok(()),
        other => Err(PipelineError::CopyVerification {
            dest: dest.to_path_buf(),
            expected,
            actual: other.unwrap_or(0),
        }),
    }
}
