use std::fs::{self, Permissions};
use std::io::Write;
use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::NaiveTime;
use rust_xlsxwriter::Workbook;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::constants::{DEFAULT_SHEET_NAME, XLSX_MAX_ROWS};
use crate::error::{Result, ZipCleanError};
use crate::types::{Cell, Table};

/// File formats the tool can both read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Csv,
}

impl SpreadsheetFormat {
    /// Picks the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("xlsx") => Ok(SpreadsheetFormat::Xlsx),
            Some("csv") => Ok(SpreadsheetFormat::Csv),
            _ => Err(ZipCleanError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Largest number of data rows (header excluded) the format can hold.
    pub fn max_data_rows(self) -> Option<usize> {
        match self {
            SpreadsheetFormat::Xlsx => Some(XLSX_MAX_ROWS - 1),
            SpreadsheetFormat::Csv => None,
        }
    }
}

/// A loaded worksheet plus what is needed to write it back the same way
#[derive(Debug, Clone)]
pub struct Spreadsheet {
    pub format: SpreadsheetFormat,
    pub sheet_name: String,
    pub table: Table,
    /// Permissions of the file this was read from, reused for new output files
    pub permissions: Option<Permissions>,
}

/// Reads the first worksheet (or the CSV body) with every cell as text.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.display()))]
pub fn read_spreadsheet(path: &Path) -> Result<Spreadsheet> {
    let format = SpreadsheetFormat::from_path(path)?;
    let mut spreadsheet = match format {
        SpreadsheetFormat::Xlsx => read_workbook(path)?,
        SpreadsheetFormat::Csv => read_csv(path)?,
    };
    spreadsheet.permissions = Some(fs::metadata(path)?.permissions());
    info!(
        rows = spreadsheet.table.row_count(),
        columns = spreadsheet.table.column_count(),
        sheet = %spreadsheet.sheet_name,
        "loaded spreadsheet"
    );
    Ok(spreadsheet)
}

/// Writes `spreadsheet` to `destination`, replacing it in one step.
///
/// The content goes to a temporary file in the destination's directory
/// first and is renamed over the destination once complete. The result keeps
/// the permissions of the file it replaces, or of the source spreadsheet when
/// the destination is new.
#[tracing::instrument(level = "debug", skip(spreadsheet, destination), fields(path = %destination.display()))]
pub fn write_spreadsheet(spreadsheet: &Spreadsheet, destination: &Path) -> Result<()> {
    let bytes = match spreadsheet.format {
        SpreadsheetFormat::Xlsx => workbook_bytes(spreadsheet)?,
        SpreadsheetFormat::Csv => csv_bytes(&spreadsheet.table)?,
    };

    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(directory)?;
    staged.write_all(&bytes)?;
    staged.flush()?;

    let permissions = match fs::metadata(destination) {
        Ok(existing) => Some(existing.permissions()),
        Err(_) => spreadsheet.permissions.clone(),
    };
    if let Some(permissions) = permissions {
        staged.as_file().set_permissions(permissions)?;
    }
    staged.persist(destination)?;

    info!(bytes = bytes.len(), "wrote spreadsheet");
    Ok(())
}

fn read_workbook(path: &Path) -> Result<Spreadsheet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ZipCleanError::EmptySheet(path.display().to_string()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| ZipCleanError::EmptySheet(sheet_name.clone()))?
        .iter()
        .map(|value| cell_text(value).unwrap_or_default())
        .collect();

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_text).collect());
    }
    debug!(sheet = %sheet_name, "parsed worksheet");

    Ok(Spreadsheet {
        format: SpreadsheetFormat::Xlsx,
        sheet_name,
        table,
        permissions: None,
    })
}

fn read_csv(path: &Path) -> Result<Spreadsheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => return Err(ZipCleanError::EmptySheet(path.display().to_string())),
    };

    let mut table = Table::new(headers);
    for record in records {
        let record = record?;
        table.push_row(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect(),
        );
    }

    Ok(Spreadsheet {
        format: SpreadsheetFormat::Csv,
        sheet_name: sheet_name_for(path),
        table,
        permissions: None,
    })
}

fn sheet_name_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string())
}

/// Text form of a workbook value. Whole floats drop their `.0` so numeric
/// ZIPs read back as `12345` rather than `12345.0`; date cells become
/// ISO text instead of their serial number.
pub fn cell_text(value: &Data) -> Cell {
    match value {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) => Some(text.clone()),
        Data::Int(number) => Some(number.to_string()),
        Data::Float(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
            Some(format!("{}", *number as i64))
        }
        Data::Float(number) => Some(number.to_string()),
        Data::Bool(flag) => Some(flag.to_string()),
        Data::DateTime(moment) => Some(excel_datetime_text(moment)),
        other => Some(other.to_string()),
    }
}

/// `2024-01-15` for plain dates, `2024-01-15 08:30:00` when a time is set,
/// `h:mm:ss` for durations.
fn excel_datetime_text(moment: &ExcelDateTime) -> String {
    if moment.is_duration() {
        if let Some(duration) = moment.as_duration() {
            let seconds = duration.num_seconds();
            return format!(
                "{}:{:02}:{:02}",
                seconds / 3600,
                (seconds % 3600) / 60,
                seconds % 60
            );
        }
    } else if let Some(datetime) = moment.as_datetime() {
        if datetime.time() == NaiveTime::MIN {
            return datetime.format("%Y-%m-%d").to_string();
        }
        return datetime.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    moment.as_f64().to_string()
}

fn workbook_bytes(spreadsheet: &Spreadsheet) -> Result<Vec<u8>> {
    let table = &spreadsheet.table;
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&spreadsheet.sheet_name)?;

    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string(0, column_number(col)?, header)?;
    }
    for (idx, row) in table.rows().iter().enumerate() {
        let row_number = u32::try_from(idx + 1)
            .map_err(|_| ZipCleanError::TooLarge(format!("{} rows", table.row_count())))?;
        for (col, cell) in row.iter().enumerate() {
            if let Some(value) = cell {
                worksheet.write_string(row_number, column_number(col)?, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_number(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| ZipCleanError::TooLarge(format!("column {}", col + 1)))
}

fn csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer
        .into_inner()
        .map_err(|e| ZipCleanError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn text(value: &str) -> Cell {
        Some(value.to_string())
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SpreadsheetFormat::from_path(Path::new("data.XLSX")).unwrap(),
            SpreadsheetFormat::Xlsx
        );
        assert_eq!(
            SpreadsheetFormat::from_path(Path::new("dir/data.csv")).unwrap(),
            SpreadsheetFormat::Csv
        );
        assert!(matches!(
            SpreadsheetFormat::from_path(Path::new("data.txt")),
            Err(ZipCleanError::UnsupportedFormat(_))
        ));
        assert!(SpreadsheetFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_cell_text_conversions() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("02134".into())), text("02134"));
        assert_eq!(cell_text(&Data::Int(12345)), text("12345"));
        assert_eq!(cell_text(&Data::Float(12345.0)), text("12345"));
        assert_eq!(cell_text(&Data::Float(2.5)), text("2.5"));
        assert_eq!(cell_text(&Data::Bool(true)), text("true"));
    }

    #[test]
    fn test_csv_round_trip_keeps_leading_zeros_and_blanks() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path: PathBuf = dir.path().join("people.csv");
        fs::write(&path, "Name,ZIP,Other\nAlice,02134-0001,\nBob,98765,bar\n")?;

        let sheet = read_spreadsheet(&path)?;
        assert_eq!(sheet.format, SpreadsheetFormat::Csv);
        assert_eq!(sheet.table.headers(), &["Name", "ZIP", "Other"]);
        assert_eq!(
            sheet.table.rows()[0],
            vec![text("Alice"), text("02134-0001"), None]
        );

        let out = dir.path().join("out.csv");
        write_spreadsheet(&sheet, &out)?;
        assert_eq!(
            fs::read_to_string(&out)?,
            "Name,ZIP,Other\nAlice,02134-0001,\nBob,98765,bar\n"
        );
        Ok(())
    }

    #[test]
    fn test_empty_csv_is_rejected() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("empty.csv");
        fs::write(&path, "")?;
        assert!(matches!(
            read_spreadsheet(&path),
            Err(ZipCleanError::EmptySheet(_))
        ));
        Ok(())
    }

    #[test]
    fn test_workbook_round_trip() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("people.xlsx");
        let sheet = Spreadsheet {
            format: SpreadsheetFormat::Xlsx,
            sheet_name: "Contacts".into(),
            table: Table::from_rows(
                vec!["Name".into(), "ZIP Code".into()],
                vec![
                    vec![text("Alice"), text("02134")],
                    vec![text("Bob"), None],
                ],
            ),
            permissions: None,
        };
        write_spreadsheet(&sheet, &path)?;

        let loaded = read_spreadsheet(&path)?;
        assert_eq!(loaded.sheet_name, "Contacts");
        assert_eq!(loaded.table, sheet.table);
        Ok(())
    }

    #[test]
    fn test_date_cells_read_as_iso_text() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("mailing.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        let stamp_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        worksheet.write_string(0, 0, "ZIP")?;
        worksheet.write_string(0, 1, "Mailed")?;
        worksheet.write_string(0, 2, "Scanned")?;
        worksheet.write_string(1, 0, "12345-6789")?;
        let mailed = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 1, 15)?;
        worksheet.write_datetime_with_format(1, 1, &mailed, &date_format)?;
        let scanned = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 1, 16)?.and_hms(8, 30, 0)?;
        worksheet.write_datetime_with_format(1, 2, &scanned, &stamp_format)?;
        workbook.save(&path)?;

        let loaded = read_spreadsheet(&path)?;
        assert_eq!(
            loaded.table.rows()[0],
            vec![text("12345-6789"), text("2024-01-15"), text("2024-01-16 08:30:00")]
        );

        // the text survives a write and a second read unchanged
        let copy = dir.path().join("copy.xlsx");
        write_spreadsheet(&loaded, &copy)?;
        assert_eq!(read_spreadsheet(&copy)?.table, loaded.table);
        Ok(())
    }

    #[test]
    fn test_max_data_rows() {
        assert_eq!(SpreadsheetFormat::Xlsx.max_data_rows(), Some(1_048_575));
        assert_eq!(SpreadsheetFormat::Csv.max_data_rows(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_permissions() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let source = dir.path().join("people.csv");
        fs::write(&source, "Name,ZIP\nAlice,12345-6789\n")?;
        fs::set_permissions(&source, Permissions::from_mode(0o644))?;
        let sheet = read_spreadsheet(&source)?;

        // new destination takes the source's mode
        let fresh = dir.path().join("fresh.csv");
        write_spreadsheet(&sheet, &fresh)?;
        assert_eq!(fs::metadata(&fresh)?.permissions().mode() & 0o777, 0o644);

        // existing destination keeps its own mode
        let existing = dir.path().join("existing.csv");
        fs::write(&existing, "old")?;
        fs::set_permissions(&existing, Permissions::from_mode(0o664))?;
        write_spreadsheet(&sheet, &existing)?;
        assert_eq!(fs::metadata(&existing)?.permissions().mode() & 0o777, 0o664);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = read_spreadsheet(Path::new("/definitely/not/here.xlsx"));
        assert!(result.is_err());
    }
}
