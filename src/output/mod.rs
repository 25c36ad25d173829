//! Console and log file output.

pub mod diagnostics;

pub use diagnostics::{Diagnostics, MessageLevel, Verbosity, log_file_name};
