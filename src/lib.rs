//! Core library for `pdf_splitter`.
//!
//! Splits a paged document into fixed-size parts inside a transient scratch folder,
//! then renames each part and moves it to the folder named by the matching row of a
//! mapping workbook. The scratch folder never outlives a cycle.
//!
//! Layout:
//! - `document`, `splitter`: page extraction and chunking.
//! - `mapping`, `correlate`: reading the workbook and pairing rows with parts.
//! - `relocator`, `confirm`, `fs_ops`: verified moves and folder creation.
//! - `scratch`, `pipeline`: one locked, self-cleaning cycle.
//! - `config`, `cli`, `output`, `shutdown`: the ambient surface used by the binary.

pub mod cli;
pub mod config;
pub mod confirm;
pub mod correlate;
pub mod document;
pub mod errors;
pub mod fs_ops;
pub mod mapping;
pub mod output;
pub mod pipeline;
pub mod relocator;
pub mod scratch;
pub mod shutdown;
pub mod splitter;

pub use config::{Config, LogLevel};
pub use errors::PipelineError;
pub use mapping::{MappingLayout, MappingRow};
pub use pipeline::{CycleReport, CycleRequest, run_cycle};
