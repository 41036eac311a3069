use tracing::debug;

/// A single spreadsheet value. `None` marks a missing (blank) cell.
pub type Cell = Option<String>;

/// Flat table as loaded from a spreadsheet: one header row plus data rows.
///
/// Every row holds exactly one cell per header; rows are padded with `None`
/// (or the header list widened) on insertion so that invariant always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Appends a row, filling short rows with blanks. Extra trailing cells
    /// get unnamed columns rather than being dropped.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        if row.len() > self.headers.len() {
            debug!(
                extra = row.len() - self.headers.len(),
                "widening table for row with unnamed trailing cells"
            );
            self.headers.resize(row.len(), String::new());
            for existing in &mut self.rows {
                existing.resize(row.len(), None);
            }
        }
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    /// Exact, case-sensitive header lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// First header equal to `name` ignoring ASCII case and surrounding whitespace.
    pub fn column_index_ignore_case(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Applies `f` to every cell of the column at `index`, returning how many
    /// cells changed value.
    pub fn map_column<F>(&mut self, index: usize, mut f: F) -> usize
    where
        F: FnMut(&Cell) -> Cell,
    {
        let mut changed = 0;
        for row in &mut self.rows {
            let updated = f(&row[index]);
            if updated != row[index] {
                row[index] = updated;
                changed += 1;
            }
        }
        changed
    }

    /// Returns the index of `name`, appending it (and backfilling every
    /// existing row with `fill`) when absent.
    pub fn ensure_column(&mut self, name: &str, fill: Cell) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(fill.clone());
        }
        self.headers.len() - 1
    }
}
