use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::{OutputConfig, OutputMode};
use crate::error::{FailureKind, Result, ZipCleanError};
use crate::normalize::{normalize_table, padding_needed, NormalizeSummary};
use crate::spreadsheet::{read_spreadsheet, write_spreadsheet, Spreadsheet};

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub summary: NormalizeSummary,
}

/// Why a run failed, in a form ready to show the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessFailure {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Success(ProcessReport),
    Failure(ProcessFailure),
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Success(_))
    }
}

/// Where the cleaned copy of `source` is written.
///
/// `InPlace` returns `source` itself; `Suffixed` inserts the suffix before the
/// extension (`data.xlsx` -> `data_cleaned.xlsx`).
pub fn destination_for(source: &Path, output: &OutputConfig) -> PathBuf {
    match output.mode {
        OutputMode::InPlace => source.to_path_buf(),
        OutputMode::Suffixed => {
            let stem = source
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let file_name = match source.extension() {
                Some(ext) => format!("{}{}.{}", stem, output.suffix, ext.to_string_lossy()),
                None => format!("{}{}", stem, output.suffix),
            };
            source.with_file_name(file_name)
        }
    }
}

/// Reads `source`, cleans its ZIP column, pads to `file_count` and writes the
/// result. Every error is folded into `ProcessOutcome::Failure`.
pub fn process_file(source: &Path, file_count: Option<usize>, output: &OutputConfig) -> ProcessOutcome {
    let span = tracing::info_span!("process_file", path = %source.display());
    let _enter = span.enter();

    match try_process_file(source, file_count, output) {
        Ok(report) => {
            info!(destination = %report.destination.display(), "file processed");
            ProcessOutcome::Success(report)
        }
        Err(e) => {
            error!("processing failed: {}", e);
            ProcessOutcome::Failure(ProcessFailure {
                kind: e.kind(),
                message: e.to_string(),
            })
        }
    }
}

fn try_process_file(
    source: &Path,
    file_count: Option<usize>,
    output: &OutputConfig,
) -> Result<ProcessReport> {
    info!("processing");
    let mut spreadsheet = read_spreadsheet(source)?;
    check_row_limit(&spreadsheet, file_count)?;
    let summary = normalize_table(&mut spreadsheet.table, file_count)?;

    let destination = destination_for(source, output);
    write_spreadsheet(&spreadsheet, &destination)?;

    Ok(ProcessReport {
        source: source.to_path_buf(),
        destination,
        summary,
    })
}

/// Rejects a padding request the output format cannot hold, before any
/// padding rows are built.
fn check_row_limit(spreadsheet: &Spreadsheet, file_count: Option<usize>) -> Result<()> {
    let Some(limit) = spreadsheet.format.max_data_rows() else {
        return Ok(());
    };
    let rows = spreadsheet.table.row_count();
    let padded = rows + file_count.map_or(0, |count| padding_needed(rows, count));
    if padded > limit {
        return Err(ZipCleanError::TooLarge(format!(
            "{} rows after padding to {} files, a worksheet holds at most {}",
            padded,
            file_count.unwrap_or(1),
            limit
        )));
    }
    Ok(())
}
