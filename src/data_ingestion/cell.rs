use chrono::NaiveDateTime;

/// One raw spreadsheet value before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
    Missing,
}

impl Cell {
    /// Text cells are trimmed; blank text counts as missing, like an empty spreadsheet cell.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Text(_) => "text",
            Cell::Number(_) => "number",
            Cell::DateTime(_) => "date-time",
            Cell::Missing => "missing",
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Cell::Missing
        } else {
            Cell::Number(value)
        }
    }
}

impl From<&str> for Cell {
    fn from(raw: &str) -> Self {
        Cell::from_text(raw)
    }
}
