use std::collections::HashMap;
use std::fs;
use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};
use tracing::{debug, info, instrument};

use super::cell::Cell;
use crate::errors::LoadError;

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];
const DELIMITER_CANDIDATES: [u8; 3] = [b';', b',', b'\t'];

/// Trims a header and collapses inner whitespace runs, so `"№  приказа "` matches `"№ приказа"`.
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One data row, addressed by normalized header name.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based position among the data rows (the header is not counted).
    pub index: usize,
    cells: HashMap<String, Cell>,
}

impl RawRow {
    pub fn new(index: usize, cells: HashMap<String, Cell>) -> Self {
        Self { index, cells }
    }

    /// Builds a row from `(header, cell)` pairs; handy for fixtures.
    pub fn from_pairs<I, H>(index: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (H, Cell)>,
        H: AsRef<str>,
    {
        let cells = pairs
            .into_iter()
            .map(|(header, cell)| (normalize_header(header.as_ref()), cell))
            .collect();
        Self { index, cells }
    }

    /// Absent columns read as [`Cell::Missing`].
    pub fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&Cell::Missing)
    }

    fn is_blank(&self) -> bool {
        self.cells.values().all(Cell::is_missing)
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl Table {
    /// Builds a table from a header line and positional rows. Fully blank rows are dropped.
    pub fn from_records(headers: Vec<String>, records: Vec<Vec<Cell>>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                let cells = headers
                    .iter()
                    .cloned()
                    .zip(record.into_iter().chain(std::iter::repeat(Cell::Missing)))
                    .collect();
                RawRow::new(position + 1, cells)
            })
            .filter(|row| !row.is_blank())
            .collect();
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Columns from `required` that the header line does not contain.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|column| !self.headers.iter().any(|h| h == *column))
            .map(|column| column.to_string())
            .collect()
    }
}

/// Reads the first worksheet of a workbook, or a delimited text export.
///
/// `delimiter` overrides detection for text files; it is ignored for workbooks.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn read_table(path: &Path, delimiter: Option<u8>) -> Result<Table, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let table = if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        read_workbook(path)?
    } else {
        read_delimited(path, delimiter)?
    };

    info!(rows = table.len(), columns = table.headers.len(), "Table loaded");
    if table.is_empty() {
        return Err(LoadError::EmptyTable { path: path.display().to_string() });
    }
    Ok(table)
}

fn detect_delimiter(header_line: &str) -> u8 {
    DELIMITER_CANDIDATES
        .iter()
        .copied()
        .rev() // ties go to the earlier candidate
        .max_by_key(|candidate| header_line.bytes().filter(|b| b == candidate).count())
        .unwrap_or(b',')
}

fn read_delimited(path: &Path, delimiter: Option<u8>) -> Result<Table, LoadError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    let content = content.trim_start_matches('\u{feff}');

    let delimiter = delimiter.unwrap_or_else(|| {
        detect_delimiter(content.lines().next().unwrap_or_default())
    });
    debug!(delimiter = %(delimiter as char), "Reading delimited export");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let csv_error = |source: csv::Error| LoadError::Csv { path: display.clone(), source };
    let headers = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        records.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(Table::from_records(headers, records))
}

fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Missing,
        Data::String(text) => Cell::from_text(text),
        Data::Float(value) => Cell::from(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Text(value.to_string()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::from_text(text),
        other => match other.as_datetime() {
            Some(value) => Cell::DateTime(value),
            None => Cell::from_text(&other.to_string()),
        },
    }
}

fn read_workbook(path: &Path) -> Result<Table, LoadError> {
    let display = path.display().to_string();
    let workbook_error = |message: String| LoadError::Workbook { path: display.clone(), message };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| workbook_error("workbook has no worksheets".to_string()))?
        .map_err(|e| workbook_error(e.to_string()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter().map(|cell| cell.to_string()).collect(),
        None => return Err(LoadError::EmptyTable { path: display }),
    };
    let records = rows.map(|row| row.iter().map(workbook_cell).collect()).collect();

    Ok(Table::from_records(headers, records))
}
