pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod spreadsheet;
pub mod types;

pub use error::{FailureKind, Result, ZipCleanError};
pub use pipeline::{process_file, ProcessOutcome};
pub use types::{Cell, Table};
