//! Cell coercers shared by the deal and order loaders.
//!
//! Every coercer maps [`Cell::Missing`] to `Ok(None)`. Values that have a
//! defined sentinel (the "no data" phrase, an unrecognised operation, a
//! currency symbol we do not know) never produce an error.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

use super::cell::Cell;
use crate::errors::CoercionError;

/// Phrase brokers put into amount columns when no figure is available ("Нет данных").
pub const NO_DATA_MARKER: &str = "данных";

/// Placeholder for "not applicable" in the order condition column.
pub const DASH_SENTINEL: &str = "-";

/// Scanned in this order; the first symbol found wins.
pub const CURRENCY_SYMBOLS: [(char, CurrencyCode); 5] = [
    ('$', CurrencyCode::Usd),
    ('₸', CurrencyCode::Kzt),
    ('£', CurrencyCode::Gbp),
    ('€', CurrencyCode::Eur),
    ('₽', CurrencyCode::Rur),
];

const APPROXIMATION_MARK: char = '~';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyCode {
    Rur,
    Usd,
    Gbp,
    Eur,
    Kzt,
    /// An amount was present but carried no recognisable currency symbol.
    Unknown,
}

impl CurrencyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Rur => "RUR",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Kzt => "KZT",
            CurrencyCode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealType {
    Buy,
    Sell,
}

impl DealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealType::Buy => "buy",
            DealType::Sell => "sell",
        }
    }
}

impl fmt::Display for DealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp layouts used by the two export families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimePattern {
    /// `31.01.2024 10:15:00`, used in deal reports.
    DayMonthYear,
    /// `2024-01-31 10:15:00`, used in order history.
    YearMonthDay,
}

impl DateTimePattern {
    pub fn format(&self) -> &'static str {
        match self {
            DateTimePattern::DayMonthYear => "%d.%m.%Y %H:%M:%S",
            DateTimePattern::YearMonthDay => "%Y-%m-%d %H:%M:%S",
        }
    }
}

fn signals_no_data(text: &str) -> bool {
    text.to_lowercase().contains(NO_DATA_MARKER)
}

/// Drops digit grouping, currency decoration and the decimal comma.
fn clean_numeric_text(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !c.is_whitespace()
                && *c != APPROXIMATION_MARK
                && !CURRENCY_SYMBOLS.iter().any(|(symbol, _)| symbol == c)
        })
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

pub fn decimal(cell: &Cell) -> Result<Option<Decimal>, CoercionError> {
    match cell {
        Cell::Missing => Ok(None),
        Cell::Number(value) => Decimal::from_f64(*value)
            .map(|d| Some(d.normalize()))
            .ok_or_else(|| CoercionError::InvalidNumber { value: value.to_string() }),
        Cell::Text(text) => {
            if signals_no_data(text) {
                return Ok(None);
            }
            let cleaned = clean_numeric_text(text);
            Decimal::from_str(&cleaned)
                .map(Some)
                .map_err(|_| CoercionError::InvalidNumber { value: text.clone() })
        }
        Cell::DateTime(_) => Err(CoercionError::UnexpectedCell { kind: cell.kind() }),
    }
}

/// Keeps digits and separators only; a minus before the first digit is kept as the sign.
fn clean_amount_text(text: &str) -> String {
    let negative = text
        .chars()
        .take_while(|c| !c.is_ascii_digit())
        .any(|c| c == '-');
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let digits = digits.trim_matches('.');
    if negative { format!("-{digits}") } else { digits.to_string() }
}

/// Commission and profit cells: any currency decoration is dropped, known or not.
pub fn amount(cell: &Cell) -> Result<Option<Decimal>, CoercionError> {
    match cell {
        Cell::Text(text) if !signals_no_data(text) => Decimal::from_str(&clean_amount_text(text))
            .map(Some)
            .map_err(|_| CoercionError::InvalidNumber { value: text.clone() }),
        _ => decimal(cell),
    }
}

pub fn integer(cell: &Cell) -> Result<Option<i64>, CoercionError> {
    match cell {
        Cell::Missing => Ok(None),
        Cell::Number(value) => {
            if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                Ok(Some(*value as i64))
            } else {
                Err(CoercionError::InvalidInteger { value: value.to_string() })
            }
        }
        Cell::Text(text) => {
            if signals_no_data(text) {
                return Ok(None);
            }
            let cleaned = clean_numeric_text(text);
            if let Ok(parsed) = cleaned.parse::<i64>() {
                return Ok(Some(parsed));
            }
            // Exports sometimes render integers as "12.0".
            Decimal::from_str(&cleaned)
                .ok()
                .filter(|d| d.fract().is_zero())
                .and_then(|d| d.to_i64())
                .map(Some)
                .ok_or_else(|| CoercionError::InvalidInteger { value: text.clone() })
        }
        Cell::DateTime(_) => Err(CoercionError::UnexpectedCell { kind: cell.kind() }),
    }
}

pub fn date_time(
    cell: &Cell,
    pattern: DateTimePattern,
) -> Result<Option<NaiveDateTime>, CoercionError> {
    match cell {
        Cell::Missing => Ok(None),
        Cell::DateTime(value) => Ok(Some(*value)),
        Cell::Text(text) => NaiveDateTime::parse_from_str(text, pattern.format())
            .map(Some)
            .map_err(|_| CoercionError::InvalidDateTime {
                value: text.clone(),
                pattern: pattern.format(),
            }),
        Cell::Number(_) => Err(CoercionError::UnexpectedCell { kind: cell.kind() }),
    }
}

/// Currency of a decorated amount such as `"$0.99"`.
pub fn currency(cell: &Cell) -> Option<CurrencyCode> {
    match cell {
        Cell::Missing => None,
        Cell::Text(text) => Some(
            CURRENCY_SYMBOLS
                .iter()
                .find(|(symbol, _)| text.contains(*symbol))
                .map(|(_, code)| *code)
                .unwrap_or(CurrencyCode::Unknown),
        ),
        Cell::Number(_) | Cell::DateTime(_) => Some(CurrencyCode::Unknown),
    }
}

pub fn deal_type(cell: &Cell) -> Option<DealType> {
    let Cell::Text(text) = cell else {
        return None;
    };
    match text.trim().to_lowercase().as_str() {
        "покупка" | "buy" => Some(DealType::Buy),
        "продажа" | "sell" => Some(DealType::Sell),
        _ => None,
    }
}

pub fn text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Missing => None,
        Cell::Text(text) => Some(text.trim().to_string()),
        Cell::Number(value) if value.fract() == 0.0 => Some(format!("{value:.0}")),
        Cell::Number(value) => Some(value.to_string()),
        Cell::DateTime(value) => Some(value.to_string()),
    }
}

pub fn is_dash(cell: &Cell) -> bool {
    matches!(cell, Cell::Text(text) if text.trim() == DASH_SENTINEL)
}
