pub mod padding;
pub mod zip_code;

use tracing::{debug, info};

use crate::constants::{zip_column_candidates, ZIP_CODE_COLUMN};
use crate::error::{Result, ZipCleanError};
use crate::types::Table;

pub use padding::{pad_to_file_count, padding_needed};
pub use zip_code::{clean_zip, normalize_zip};

/// What a normalization pass did to a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub zip_column: String,
    pub zips_changed: usize,
    pub padding_rows: usize,
    pub total_rows: usize,
}

/// Finds the ZIP column.
///
/// Resolution order: exact `"ZIP Code"`, then `"ZIP CODE"` ignoring case,
/// then `"ZIP"` ignoring case. The first matching header in column order
/// wins at each step.
pub fn locate_zip_column(table: &Table) -> Result<usize> {
    if let Some(index) = table.column_index(ZIP_CODE_COLUMN) {
        return Ok(index);
    }
    zip_column_candidates()
        .iter()
        .find_map(|name| table.column_index_ignore_case(name))
        .ok_or(ZipCleanError::ColumnNotFound)
}

/// Cleans the ZIP column in place and, when `file_count` is set and
/// non-zero, pads the table to a multiple of it.
pub fn normalize_table(table: &mut Table, file_count: Option<usize>) -> Result<NormalizeSummary> {
    let zip_index = locate_zip_column(table)?;
    let zip_column = table.headers()[zip_index].clone();
    debug!(column = %zip_column, index = zip_index, "resolved ZIP column");

    let zips_changed = table.map_column(zip_index, normalize_zip);

    let padding_rows = match file_count {
        Some(count) if count > 0 => pad_to_file_count(table, count),
        _ => 0,
    };

    info!(
        column = %zip_column,
        zips_changed,
        padding_rows,
        rows = table.row_count(),
        "normalized table"
    );

    Ok(NormalizeSummary {
        zip_column,
        zips_changed,
        padding_rows,
        total_rows: table.row_count(),
    })
}
