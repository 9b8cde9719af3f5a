//! Remembered mapping workbook.
//!
//! A flat JSON record `{"excel_path": "<path>"}`. A missing file, a missing key or
//! an empty value all mean "nothing remembered"; a corrupt file is logged and
//! treated the same way.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::fs_ops::write_file_atomic;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    excel_path: Option<String>,
}

/// The remembered mapping workbook path, if any.
pub fn load_remembered_mapping(state_file: &Path) -> Option<PathBuf> {
    let contents = match fs::read_to_string(state_file) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %state_file.display(), error = %e, "cannot read saved state");
            return None;
        }
    };
    match serde_json::from_str::<SavedState>(&contents) {
        Ok(state) => state
            .excel_path
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from),
        Err(e) => {
            warn!(path = %state_file.display(), error = %e, "ignoring malformed saved state");
            None
        }
    }
}

/// Persist `mapping` as the remembered workbook.
pub fn remember_mapping(state_file: &Path, mapping: &Path) -> Result<()> {
    if let Some(parent) = state_file.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create state directory '{}'", parent.display()))?;
    }
    let state = SavedState {
        excel_path: Some(mapping.to_string_lossy().into_owned()),
    };
    let json = serde_json::to_vec(&state)?;
    write_file_atomic(state_file, &json).with_context(|| format!("write saved state '{}'", state_file.display()))?;
    debug!(path = %state_file.display(), mapping = %mapping.display(), "remembered mapping path");
    Ok(())
}
