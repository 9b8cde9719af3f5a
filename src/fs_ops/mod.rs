//! Filesystem operations shared by the splitter, relocator and config state.

mod atomic;
mod copy;
mod helpers;
mod io_copy;
mod meta;
pub(crate) mod util;

pub use copy::{copy_verified, write_file_atomic};
pub use helpers::{describe_io, io_error_with_help};
