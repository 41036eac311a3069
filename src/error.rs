use thiserror::Error;

/// Coarse classification reported to the user for a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The spreadsheet has no recognizable ZIP column.
    ColumnNotFound,
    /// Anything else that went wrong while reading, transforming or writing.
    Processing,
}

#[derive(Error, Debug)]
pub enum ZipCleanError {
    #[error("Column 'ZIP Code' not found in the spreadsheet.")]
    ColumnNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Failed to write workbook: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to replace output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported spreadsheet format: {0}")]
    UnsupportedFormat(String),

    #[error("Spreadsheet '{0}' has no header row")]
    EmptySheet(String),

    #[error("Table too large for a worksheet: {0}")]
    TooLarge(String),
}

impl ZipCleanError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ZipCleanError::ColumnNotFound => FailureKind::ColumnNotFound,
            _ => FailureKind::Processing,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZipCleanError>;
