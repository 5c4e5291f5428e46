use std::io::Read;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A raw, untyped table as read from a CSV file
///
/// Cells are kept as text. Empty cells are stored as `None`, mirroring a
/// missing value in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from string literals, treating empty strings as missing.
    #[must_use]
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Self {
        let headers = headers.iter().map(|h| (*h).to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| non_empty(cell)).collect())
            .collect();
        Self { headers, rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive column lookup, returning the first match
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Cell value at (`row`, `col`), `None` when missing or out of range
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }
}

fn non_empty(cell: &str) -> Option<String> {
    if cell.trim().is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Read a CSV file with a header row into a [`RawTable`]
///
/// # Errors
///
/// Returns `TableError::Io` if the file cannot be opened and
/// `TableError::Csv` if a record cannot be decoded or has the wrong width.
pub fn read_table(path: &Path) -> Result<RawTable, TableError> {
    let file = std::fs::File::open(path)?;
    let table = read_table_from(file)?;
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers.len(),
        "Read table"
    );
    Ok(table)
}

/// Parse CSV text with a header row into a [`RawTable`]
///
/// # Errors
///
/// Returns `TableError::Csv` if a record cannot be decoded or has the
/// wrong width.
pub fn parse_table_text(text: &str) -> Result<RawTable, TableError> {
    read_table_from(text.as_bytes())
}

fn read_table_from<R: Read>(reader: R) -> Result<RawTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader
        .headers()?
        .iter()
        .map(std::string::ToString::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(non_empty).collect());
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_text() {
        let csv = "Name,Province,Fuel,Capacity,Status
Vung Ang 1,Ha Tinh,Coal,1200 MW,operating
Phu My 3,Ba Ria - Vung Tau,Gas,,operating
";
        let table = parse_table_text(csv).unwrap();
        assert_eq!(table.headers, vec!["Name", "Province", "Fuel", "Capacity", "Status"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 0), Some("Vung Ang 1"));
        assert_eq!(table.cell(1, 3), None);
        assert_eq!(table.column_index("capacity"), Some(3));
    }

    #[test]
    fn test_parse_table_quoted_fields() {
        let csv = "name,capacity\n\"Duyen Hai 1, 2\",\"1,245\"\n";
        let table = parse_table_text(csv).unwrap();
        assert_eq!(table.cell(0, 0), Some("Duyen Hai 1, 2"));
        assert_eq!(table.cell(0, 1), Some("1,245"));
    }

    #[test]
    fn test_parse_table_ragged_row_is_error() {
        let csv = "name,capacity\nPlant A,100,extra\n";
        assert!(matches!(parse_table_text(csv), Err(TableError::Csv(_))));
    }

    #[test]
    fn test_read_table_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(temp, "name,province,fuel,capacity,status").unwrap();
        writeln!(temp, "Plant A,Ha Tinh,coal,100,operating").unwrap();
        temp.flush().unwrap();

        let table = read_table(temp.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 4), Some("operating"));
    }
}
