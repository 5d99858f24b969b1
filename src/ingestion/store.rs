use chrono::NaiveDate;

use crate::db::models::deals::NewDealModel;
use crate::db::models::exchange_rates::{EmptyRateRecord, NewExchangeRateModel};
use crate::db::models::orders::NewOrderModel;
use crate::errors::PersistenceError;
use crate::exchange_rates::CurrencyRates;

/// Result of an insert-if-absent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row with the same unique key already existed; nothing was written.
    Skipped,
}

impl InsertOutcome {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            InsertOutcome::Inserted
        } else {
            InsertOutcome::Skipped
        }
    }
}

/// Persistence operations the ingestion drivers rely on.
///
/// Every `insert_*` is a single conditional insert: it never overwrites an
/// existing row and is safe to repeat.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    async fn insert_deal(&self, deal: &NewDealModel) -> Result<InsertOutcome, PersistenceError>;

    async fn insert_order(&self, order: &NewOrderModel) -> Result<InsertOutcome, PersistenceError>;

    async fn insert_exchange_rate(
        &self,
        rate: &NewExchangeRateModel,
    ) -> Result<InsertOutcome, PersistenceError>;

    async fn exchange_rate_exists(&self, rate_date: NaiveDate) -> Result<bool, PersistenceError>;

    /// Rows whose foreign currency columns are all null.
    async fn empty_exchange_rates(&self) -> Result<Vec<EmptyRateRecord>, PersistenceError>;

    /// Fills an empty row in place. Returns `false` when the row was no longer empty.
    async fn fill_exchange_rate(
        &self,
        rate_id: i32,
        rates: &CurrencyRates,
    ) -> Result<bool, PersistenceError>;
}
