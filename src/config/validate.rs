//! Config validation logic.
//! Everything here runs before any file is opened, so bad settings never leave
//! partial work behind.

use std::path::Path;
use tracing::debug;

use super::types::Config;
use crate::errors::PipelineError;
use crate::pipeline::validate_pages_per_split;

impl Config {
    /// Check settings that do not depend on the filesystem.
    pub fn validate(&self) -> Result<(), PipelineError> {
        validate_pages_per_split(self.pages_per_split)?;

        for (name, value) in [
            ("sheet", &self.layout.sheet),
            ("name_column", &self.layout.name_column),
            ("path_column", &self.layout.path_column),
        ] {
            if value.trim().is_empty() {
                return Err(PipelineError::Configuration(format!("{name} must not be empty")));
            }
        }
        if self.layout.name_column.trim().eq_ignore_ascii_case(self.layout.path_column.trim()) {
            return Err(PipelineError::Configuration(format!(
                "name_column and path_column both refer to '{}'",
                self.layout.name_column
            )));
        }

        ensure_scratch_is_disposable(&self.scratch_dir)?;

        debug!(
            pages_per_split = self.pages_per_split,
            scratch = %self.scratch_dir.display(),
            sheet = %self.layout.sheet,
            "config validated"
        );
        Ok(())
    }
}

/// The scratch directory is deleted after every run, so it must be a dedicated
/// named folder: not a root, not `.`/`..`, not the home directory.
fn ensure_scratch_is_disposable(dir: &Path) -> Result<(), PipelineError> {
    // file_name() is None for roots and for paths ending in `.` or `..`.
    let named = dir.file_name().is_some();
    let is_home = dirs::home_dir().is_some_and(|h| h == dir);
    if !named || is_home || dir.as_os_str().is_empty() {
        return Err(PipelineError::Configuration(format!(
            "scratch_dir '{}' must be a dedicated folder; it is deleted after every run",
            dir.display()
        )));
    }
    Ok(())
}
