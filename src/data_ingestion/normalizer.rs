//! Row normalization, parameterized by the target table.

use super::cell::Cell;
use super::spreadsheet::RawRow;
use super::{deal, order};
use crate::db::models::deals::NewDealModel;
use crate::db::models::orders::NewOrderModel;
use crate::errors::{CoercionError, RowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSchema {
    Deal,
    Order,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedRecord {
    Deal(NewDealModel),
    Order(NewOrderModel),
}

impl NormalizedRecord {
    pub fn natural_key(&self) -> i64 {
        match self {
            NormalizedRecord::Deal(deal) => deal.deal_number,
            NormalizedRecord::Order(order) => order.order_number,
        }
    }
}

impl RecordSchema {
    pub fn name(&self) -> &'static str {
        match self {
            RecordSchema::Deal => "deals",
            RecordSchema::Order => "orders",
        }
    }

    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            RecordSchema::Deal => &deal::REQUIRED_COLUMNS,
            RecordSchema::Order => &order::REQUIRED_COLUMNS,
        }
    }

    pub fn normalize(&self, row: &RawRow) -> Result<NormalizedRecord, RowError> {
        match self {
            RecordSchema::Deal => deal::normalize_deal(row).map(NormalizedRecord::Deal),
            RecordSchema::Order => order::normalize_order(row).map(NormalizedRecord::Order),
        }
    }
}

/// Applies `coerce` to one column, tagging failures with the row and column.
pub(crate) fn column<T>(
    row: &RawRow,
    column: &'static str,
    coerce: impl FnOnce(&Cell) -> Result<Option<T>, CoercionError>,
) -> Result<Option<T>, RowError> {
    coerce(row.get(column)).map_err(|source| RowError::Coercion {
        index: row.index,
        column,
        source,
    })
}

/// Like [`column`], but an empty result is a [`RowError::MissingField`].
pub(crate) fn required<T>(
    row: &RawRow,
    column_name: &'static str,
    coerce: impl FnOnce(&Cell) -> Result<Option<T>, CoercionError>,
) -> Result<T, RowError> {
    column(row, column_name, coerce)?.ok_or(RowError::MissingField {
        index: row.index,
        column: column_name,
    })
}
