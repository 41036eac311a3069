/// Column name constants to keep lookups and padding consistent across the codebase

// Preferred ZIP header, matched exactly before any case-insensitive fallback
pub const ZIP_CODE_COLUMN: &str = "ZIP Code";

// Short ZIP header accepted as a last resort (case-insensitive)
pub const ZIP_SHORT_COLUMN: &str = "ZIP";

// Columns created when padding rows are appended
pub const TOP_FOLD_COLUMN: &str = "Top Fold Message";
pub const BOTTOM_FOLD_COLUMN: &str = "Bottom Fold Message";

/// Value written into the marker cells of a padding row
pub const PADDING_MARKER: &str = "-";

// Output defaults
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_cleaned";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Rows per xlsx worksheet, header row included
pub const XLSX_MAX_ROWS: usize = 1_048_576;

// Configuration and logging defaults
pub const DEFAULT_CONFIG_FILE: &str = "zipclean.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "zipclean.log";

/// ZIP header candidates in resolution order (after the exact `ZIP_CODE_COLUMN` match)
pub fn zip_column_candidates() -> [&'static str; 2] {
    [ZIP_CODE_COLUMN, ZIP_SHORT_COLUMN]
}

/// Columns that receive the padding marker in addition to the first column
pub fn fold_columns() -> [&'static str; 2] {
    [TOP_FOLD_COLUMN, BOTTOM_FOLD_COLUMN]
}
