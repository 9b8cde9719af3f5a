//! Config module.
//! Provides configuration types, default paths, XML loading, validation and the
//! remembered-workbook state file.

pub mod paths;
pub mod state;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, default_state_path, path_has_symlink_ancestor};
pub use state::{load_remembered_mapping, remember_mapping};
pub use types::{Config, LogLevel};
pub use xml::{LoadResult, create_template_config, load_config_from_xml_path, load_or_init};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PDF_SPLITTER_CONFIG";

/// Pages per part when neither config nor CLI says otherwise.
pub const DEFAULT_PAGES_PER_SPLIT: i64 = 2;
