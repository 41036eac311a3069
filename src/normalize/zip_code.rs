use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Cell;

static ZIP_PLUS_FOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{5})-\d{4}$").expect("ZIP+4 pattern is valid"));

/// Strips a ZIP+4 extension: `"12345-6789"` becomes `"12345"`.
///
/// Accepts anything printable so numeric cells (`12345`) normalize the same
/// way as text. The value is trimmed first. Values that are not exact ZIP+4
/// keep everything before the first hyphen, or the whole trimmed value when
/// there is no hyphen.
pub fn clean_zip<V: ToString + ?Sized>(value: &V) -> String {
    let raw = value.to_string();
    let trimmed = raw.trim();

    if let Some(captures) = ZIP_PLUS_FOUR.captures(trimmed) {
        return captures[1].to_string();
    }

    match trimmed.split_once('-') {
        Some((head, _)) => head.to_string(),
        None => trimmed.to_string(),
    }
}

/// Cell-level wrapper around [`clean_zip`]; blank cells stay blank.
pub fn normalize_zip(cell: &Cell) -> Cell {
    cell.as_deref().map(|value| clean_zip(value))
}
