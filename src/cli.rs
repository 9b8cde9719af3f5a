//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - --yes and --no-create replace the interactive folder prompt.
//! - --pages-per-split is signed so negative input reaches validation instead of
//!   failing inside clap with a less helpful message.

use clap::{ArgGroup, Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Split a PDF into parts and file each part where the mapping workbook says.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Split a PDF into fixed-size parts, then rename and file them from a spreadsheet"
)]
#[command(group(ArgGroup::new("folder_policy").args(["yes", "no_create"])))]
pub struct Args {
    /// PDF to split.
    #[arg(value_name = "DOCUMENT", value_hint = ValueHint::FilePath, required_unless_present = "print_config")]
    pub document: Option<PathBuf>,

    /// Mapping workbook (xlsx/xlsm/xls/ods). Defaults to the remembered workbook.
    #[arg(long, short = 'm', value_name = "WORKBOOK", value_hint = ValueHint::FilePath)]
    pub mapping: Option<PathBuf>,

    /// Remember --mapping for future runs.
    #[arg(long, requires = "mapping", help = "Remember the given --mapping workbook for future runs")]
    pub remember: bool,

    /// Pages in each output part.
    #[arg(long, short = 'n', value_name = "N", allow_negative_numbers = true)]
    pub pages_per_split: Option<i64>,

    /// Transient folder for parts (wiped before and removed after the run).
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub scratch_dir: Option<PathBuf>,

    /// Workbook sheet holding the mapping.
    #[arg(long)]
    pub sheet: Option<String>,

    /// Header of the column with new file names.
    #[arg(long)]
    pub name_column: Option<String>,

    /// Header of the column with destination folders.
    #[arg(long)]
    pub path_column: Option<String>,

    /// Header of a column with explicit part numbers (replaces row-order matching).
    #[arg(long)]
    pub chunk_column: Option<String>,

    /// Create missing destination folders without asking.
    #[arg(long, short = 'y', help = "Create missing destination folders without asking")]
    pub yes: bool,

    /// Never create missing destination folders; affected rows are skipped.
    #[arg(long, help = "Never create missing destination folders (rows are skipped)")]
    pub no_create: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Append logs to this file as well as the console.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where pdf_splitter looks for its config and state files, then exit.
    #[arg(long, help = "Print the config and state file locations and exit")]
    pub print_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(n) = self.pages_per_split {
            cfg.pages_per_split = n;
        }
        if let Some(dir) = &self.scratch_dir {
            cfg.scratch_dir = dir.clone();
        }
        if let Some(sheet) = &self.sheet {
            cfg.layout.sheet = sheet.clone();
        }
        if let Some(col) = &self.name_column {
            cfg.layout.name_column = col.clone();
        }
        if let Some(col) = &self.path_column {
            cfg.layout.path_column = col.clone();
        }
        if let Some(col) = &self.chunk_column {
            cfg.layout.chunk_column = Some(col.clone());
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(file.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
