//! # sheetdash common
//!
//! Shared types and plumbing for the sheetdash workspace: the error type,
//! logging bootstrap, the record model, column normalization, record
//! sources and the client directory.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod directory;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod source;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use directory::{ClientDirectory, StaticDirectory};
pub use error::{DashError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use normalize::{is_normalized, normalize_column_name};
pub use source::{export_url, CsvFileSource, RecordSource, SheetSource, SheetSourceConfig};
pub use types::*;
