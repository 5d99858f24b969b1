use chrono::NaiveDate;
use thiserror::Error;

/// A single cell could not be turned into the requested type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoercionError {
    #[error("cannot parse {value:?} as a number")]
    InvalidNumber { value: String },

    #[error("cannot parse {value:?} as an integer")]
    InvalidInteger { value: String },

    #[error("cannot parse {value:?} as a date-time (expected {pattern})")]
    InvalidDateTime { value: String, pattern: &'static str },

    #[error("unexpected {kind} cell")]
    UnexpectedCell { kind: &'static str },
}

/// A spreadsheet row that could not be normalized. Row indices are 1-based.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RowError {
    #[error("row {index}, column {column:?}: {source}")]
    Coercion {
        index: usize,
        column: &'static str,
        #[source]
        source: CoercionError,
    },

    #[error("row {index}: required column {column:?} is empty")]
    MissingField { index: usize, column: &'static str },

    #[error("row {index}, column {column:?}: {reason}")]
    InvalidValue {
        index: usize,
        column: &'static str,
        reason: String,
    },
}

impl RowError {
    pub fn index(&self) -> usize {
        match self {
            RowError::Coercion { index, .. }
            | RowError::MissingField { index, .. }
            | RowError::InvalidValue { index, .. } => *index,
        }
    }
}

/// Rates for a date could not be retrieved or understood.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate request for {date} failed: {source}")]
    Http {
        date: NaiveDate,
        #[source]
        source: reqwest::Error,
    },

    #[error("rate feed for {date} is malformed: {message}")]
    Parse { date: NaiveDate, message: String },

    #[error("rate feed for {date} lists no currencies")]
    EmptyListing { date: NaiveDate },
}

impl FetchError {
    pub fn date(&self) -> NaiveDate {
        match self {
            FetchError::Http { date, .. }
            | FetchError::Parse { date, .. }
            | FetchError::EmptyListing { date } => *date,
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The input table itself is unusable; nothing was ingested.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read delimited file {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read workbook {path}: {message}")]
    Workbook { path: String, message: String },

    #[error("{path} contains no data rows")]
    EmptyTable { path: String },

    #[error("{path} is missing required columns: {}", .columns.join(", "))]
    MissingColumns { path: String, columns: Vec<String> },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Failure of the single-date rate load; nothing is written when this is returned.
#[derive(Debug, Error)]
pub enum DailyRateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
