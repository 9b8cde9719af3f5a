//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/state/log/scratch paths.

use dirs::{cache_dir, config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CONFIG_ENV;

const APP_DIR: &str = "pdf_splitter";

fn app_dir(base: Option<PathBuf>, home_fallback: &[&str]) -> Option<PathBuf> {
    base.map(|b| b.join(APP_DIR)).or_else(|| {
        env::var_os("HOME").map(|h| {
            let mut p = PathBuf::from(h);
            p.extend(home_fallback);
            p.join(APP_DIR)
        })
    })
}

/// Config file path: `$PDF_SPLITTER_CONFIG` if set, else `<config_dir>/pdf_splitter/config.xml`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(p));
    }
    app_dir(config_dir(), &[".config"]).map(|d| d.join("config.xml"))
}

/// JSON file holding the remembered mapping workbook path.
pub fn default_state_path() -> Option<PathBuf> {
    app_dir(config_dir(), &[".config"]).map(|d| d.join("state.json"))
}

/// OS-appropriate default log file path (data dir).
pub fn default_log_path() -> Option<PathBuf> {
    app_dir(data_dir(), &[".local", "share"]).map(|d| d.join("pdf_splitter.log"))
}

/// Scratch directory used when none is configured.
pub fn default_scratch_dir() -> PathBuf {
    app_dir(cache_dir(), &[".cache"])
        .unwrap_or_else(|| env::temp_dir().join(APP_DIR))
        .join("output_pdfs")
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
