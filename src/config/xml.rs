//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Creates a commented template on first run when the default location is used.
//!
//! Notes:
//! - Unknown XML fields are rejected so typos surface instead of being ignored.
//! - Every field is optional; missing fields keep their built-in defaults.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::paths::{default_config_path, default_scratch_dir, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::{CONFIG_ENV, DEFAULT_PAGES_PER_SPLIT};
use crate::fs_ops::write_file_atomic;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(default, deserialize_with = "de_i64_trimmed_opt")]
    pages_per_split: Option<i64>,
    scratch_dir: Option<String>,
    sheet: Option<String>,
    name_column: Option<String>,
    path_column: Option<String>,
    chunk_column: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

/// Outcome of looking for a config file at startup.
#[derive(Debug)]
pub enum LoadResult {
    /// A config file was read.
    Loaded(Config, PathBuf),
    /// No config file; a template was written to this path and defaults apply.
    CreatedTemplate(PathBuf),
    /// No config file and none created; defaults apply.
    Defaults,
}

// Integer fields tolerate surrounding whitespace but not garbage.
fn de_i64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("'{s}' is not an integer"))),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Map XmlConfig -> Config, starting from defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(n) = parsed.pages_per_split {
        cfg.pages_per_split = n;
    }
    if let Some(dir) = non_empty(parsed.scratch_dir) {
        cfg.scratch_dir = PathBuf::from(dir);
    }
    if let Some(sheet) = non_empty(parsed.sheet) {
        cfg.layout.sheet = sheet;
    }
    if let Some(col) = non_empty(parsed.name_column) {
        cfg.layout.name_column = col;
    }
    if let Some(col) = non_empty(parsed.path_column) {
        cfg.layout.path_column = col;
    }
    cfg.layout.chunk_column = non_empty(parsed.chunk_column);
    if let Some(lvl) = non_empty(parsed.log_level) {
        cfg.log_level = lvl.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    cfg.log_file = non_empty(parsed.log_file).map(PathBuf::from);

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig =
        from_xml_str(&contents).with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Resolve and load the config file.
///
/// - `$PDF_SPLITTER_CONFIG` must point at an existing file when set.
/// - At the default location a missing file is replaced by a template.
pub fn load_or_init() -> Result<LoadResult> {
    let explicit = env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty());
    let Some(path) = default_config_path() else {
        return Ok(LoadResult::Defaults);
    };

    if path.exists() {
        let cfg = load_config_from_xml_path(&path)?;
        return Ok(LoadResult::Loaded(cfg, path));
    }
    if explicit {
        bail!("{} points at '{}', which does not exist", CONFIG_ENV, path.display());
    }

    match create_template_config(&path) {
        Ok(()) => Ok(LoadResult::CreatedTemplate(path)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "could not write template config");
            Ok(LoadResult::Defaults)
        }
    }
}

/// Write a commented template config. Refuses to write through symlinked ancestors.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!("Refusing to create config: ancestor of {} is a symlink", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = format!(
        "<!--\n  pdf_splitter configuration (XML)\n\n    pages_per_split -> pages in each output part (positive integer)\n    scratch_dir     -> transient folder for parts; wiped before and removed after every run\n    sheet           -> workbook sheet holding the mapping\n    name_column     -> header of the column with the new file names\n    path_column     -> header of the column with destination folders\n    chunk_column    -> optional header of a column with explicit part numbers\n                       (when empty, row order decides which part goes where)\n    log_level       -> quiet | normal | info | debug\n    log_file        -> path to a log file (optional)\n\n  CLI flags override these values.\n-->\n<config>\n  <pages_per_split>{}</pages_per_split>\n  <scratch_dir>{}</scratch_dir>\n  <sheet>pdf</sheet>\n  <name_column>B</name_column>\n  <path_column>C</path_column>\n  <chunk_column></chunk_column>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n</config>\n",
        DEFAULT_PAGES_PER_SPLIT,
        default_scratch_dir().display(),
    );

    write_file_atomic(path, content.as_bytes())?;
    info!("Created template config at {}", path.display());
    Ok(())
}
