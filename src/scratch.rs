//! Scratch-area lifecycle.
//!
//! [`ScratchArea`] owns the transient directory that holds split artifacts between
//! the split and the relocation. Preparing it takes an exclusive advisory lock on a
//! sidecar `<dir>.lock` file, wipes whatever a previous run left behind and creates
//! a fresh directory. Dropping the guard removes the directory and the lock file, on
//! success and on every error path alike.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::errors::PipelineError;
use crate::fs_ops::util::is_temp_name;

pub struct ScratchArea {
    path: PathBuf,
    lock_path: PathBuf,
    lock: Option<File>,
    purged: bool,
}

impl ScratchArea {
    /// Lock, clear and create the scratch directory at `path`.
    pub fn prepare(path: &Path) -> Result<Self, PipelineError> {
        let lock_path = lock_path_for(path)?;
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(PipelineError::scratch_write("create scratch parent", parent))?;
        }

        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(PipelineError::scratch_write("open scratch lock", &lock_path))?;
        if let Err(e) = lock.try_lock_exclusive() {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() || e.kind() == io::ErrorKind::WouldBlock {
                return Err(PipelineError::ScratchLocked(path.to_path_buf()));
            }
            return Err(PipelineError::scratch_write("lock scratch area", &lock_path)(e));
        }

        // From here on the guard exists, so any early return still releases the lock.
        let area = Self {
            path: path.to_path_buf(),
            lock_path,
            lock: Some(lock),
            purged: false,
        };
        area.clear_residue()?;
        fs::create_dir_all(&area.path).map_err(PipelineError::scratch_write("create scratch directory", &area.path))?;
        debug!(path = %area.path.display(), "scratch area ready");
        Ok(area)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `part_*` artifacts still present, ordered by chunk index.
    pub fn leftover_artifacts(&self) -> Vec<PathBuf> {
        let mut found: Vec<(usize, PathBuf)> = WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_str()?;
                if is_temp_name(name) {
                    return None;
                }
                let index = artifact_index_of(name)?;
                Some((index, e.into_path()))
            })
            .collect();
        found.sort();
        found.into_iter().map(|(_, p)| p).collect()
    }

    /// Remove the scratch directory now and report failures.
    pub fn purge(mut self) -> Result<(), PipelineError> {
        self.cleanup()
    }

    fn clear_residue(&self) -> Result<(), PipelineError> {
        match fs::symlink_metadata(&self.path) {
            Ok(m) if m.is_dir() => {
                warn!(path = %self.path.display(), "removing residue from a previous run");
                fs::remove_dir_all(&self.path)
                    .map_err(PipelineError::scratch_write("clear scratch directory", &self.path))
            }
            Ok(_) => fs::remove_file(&self.path).map_err(PipelineError::scratch_write("clear scratch path", &self.path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PipelineError::scratch_write("stat scratch directory", &self.path)(e)),
        }
    }

    fn cleanup(&mut self) -> Result<(), PipelineError> {
        if self.purged {
            return Ok(());
        }
        self.purged = true;

        let removed = match fs::remove_dir_all(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "scratch area removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PipelineError::scratch_write("remove scratch directory", &self.path)(e)),
        };

        if let Some(lock) = self.lock.take() {
            let _ = fs2::FileExt::unlock(&lock);
        }
        let _ = fs::remove_file(&self.lock_path);
        removed
    }
}

impl Drop for ScratchArea {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!(path = %self.path.display(), error = %e, "failed to remove scratch area");
        }
    }
}

/// Sidecar lock path: `<dir>.lock` next to the scratch directory.
fn lock_path_for(path: &Path) -> Result<PathBuf, PipelineError> {
    let name = path.file_name().ok_or_else(|| {
        PipelineError::Configuration(format!("scratch directory '{}' has no final component", path.display()))
    })?;
    let mut lock_name = name.to_os_string();
    lock_name.push(".lock");
    Ok(path.with_file_name(lock_name))
}

/// Index encoded in `part_{index}[.ext]`.
fn artifact_index_of(name: &str) -> Option<usize> {
    let rest = name.strip_prefix("part_")?;
    let digits = rest.split('.').next()?;
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn prepare_clears_residue_and_drop_removes_everything() {
        let td = tempdir().unwrap();
        let path = td.path().join("output_pdfs");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("part_9.pdf"), "stale").unwrap();

        {
            let area = ScratchArea::prepare(&path).unwrap();
            assert!(area.path().is_dir());
            assert!(area.leftover_artifacts().is_empty(), "residue must be gone");
            assert!(td.path().join("output_pdfs.lock").exists());
        }

        assert!(!path.exists());
        assert!(!td.path().join("output_pdfs.lock").exists());
    }

    #[test]
    fn second_prepare_on_the_same_path_is_locked_out() {
        let td = tempdir().unwrap();
        let path = td.path().join("scratch");
        let first = ScratchArea::prepare(&path).unwrap();

        let err = ScratchArea::prepare(&path).err().unwrap();
        assert!(matches!(err, PipelineError::ScratchLocked(_)), "{err}");
        assert!(first.path().is_dir(), "the locked-out attempt must not touch the directory");

        first.purge().unwrap();
        assert!(!path.exists());
        let again = ScratchArea::prepare(&path).unwrap();
        drop(again);
    }

    #[test]
    fn leftovers_are_sorted_numerically_and_skip_temps() {
        let td = tempdir().unwrap();
        let area = ScratchArea::prepare(&td.path().join("s")).unwrap();
        for name in ["part_10.pdf", "part_2.pdf", "notes.txt", ".pdf_splitter.1.2.3.tmp"] {
            fs::write(area.path().join(name), "x").unwrap();
        }
        let names: Vec<_> = area
            .leftover_artifacts()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["part_2.pdf", "part_10.pdf"]);
    }

    #[test]
    fn root_like_paths_are_rejected() {
        assert!(matches!(
            ScratchArea::prepare(Path::new("/")).err().unwrap(),
            PipelineError::Configuration(_)
        ));
    }
}
