use tracing::debug;

use crate::constants::{fold_columns, PADDING_MARKER};
use crate::types::{Cell, Table};

/// Number of rows needed so `total_rows` splits evenly into `file_count` files.
///
/// Returns 0 when `file_count` is 0 or the table already divides evenly.
pub fn padding_needed(total_rows: usize, file_count: usize) -> usize {
    if file_count == 0 {
        return 0;
    }
    let rows_per_file = total_rows.div_ceil(file_count);
    rows_per_file * file_count - total_rows
}

/// Appends marker rows until the row count is a multiple of `file_count`.
///
/// Padding rows carry `-` in the first column and in both fold-message
/// columns (created on demand, backfilled with empty strings) and empty
/// strings everywhere else. Returns the number of rows appended.
pub fn pad_to_file_count(table: &mut Table, file_count: usize) -> usize {
    let padding = padding_needed(table.row_count(), file_count);
    if padding == 0 {
        return 0;
    }

    let marker_columns: Vec<usize> = fold_columns()
        .iter()
        .map(|name| table.ensure_column(name, Some(String::new())))
        .collect();

    let mut template: Vec<Cell> = vec![Some(String::new()); table.column_count()];
    template[0] = Some(PADDING_MARKER.to_string());
    for index in marker_columns {
        template[index] = Some(PADDING_MARKER.to_string());
    }

    debug!(padding, file_count, "appending padding rows");
    for _ in 0..padding {
        table.push_row(template.clone());
    }
    padding
}
