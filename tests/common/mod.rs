#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use invest_loaders::data_ingestion::cell::Cell;
use invest_loaders::data_ingestion::spreadsheet::Table;
use invest_loaders::db::models::deals::NewDealModel;
use invest_loaders::db::models::exchange_rates::{EmptyRateRecord, NewExchangeRateModel};
use invest_loaders::db::models::orders::NewOrderModel;
use invest_loaders::errors::{FetchError, PersistenceError};
use invest_loaders::exchange_rates::{CurrencyRates, RateSource, RateTable};
use invest_loaders::ingestion::store::{InsertOutcome, RecordStore};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRate {
    pub rate_id: i32,
    pub rates: CurrencyRates,
}

#[derive(Default)]
struct Tables {
    deals: HashMap<i64, NewDealModel>,
    orders: HashMap<i64, NewOrderModel>,
    rates: BTreeMap<NaiveDate, StoredRate>,
    next_rate_id: i32,
}

/// In-memory store with the same insert-if-absent and fill-only-if-empty rules as Postgres.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    broken_fill: Mutex<Option<i32>>,
}

impl MemoryStore {
    pub fn deal_count(&self) -> usize {
        self.tables.lock().unwrap().deals.len()
    }

    pub fn order_count(&self) -> usize {
        self.tables.lock().unwrap().orders.len()
    }

    pub fn deal(&self, deal_number: i64) -> Option<NewDealModel> {
        self.tables.lock().unwrap().deals.get(&deal_number).cloned()
    }

    pub fn order(&self, order_number: i64) -> Option<NewOrderModel> {
        self.tables.lock().unwrap().orders.get(&order_number).cloned()
    }

    pub fn rate(&self, date: NaiveDate) -> Option<StoredRate> {
        self.tables.lock().unwrap().rates.get(&date).cloned()
    }

    pub fn rate_dates(&self) -> Vec<NaiveDate> {
        self.tables.lock().unwrap().rates.keys().copied().collect()
    }

    /// Makes `fill_exchange_rate` fail with a storage error for this row.
    pub fn break_fill_for(&self, rate_id: i32) {
        *self.broken_fill.lock().unwrap() = Some(rate_id);
    }

    pub fn seed_rate(&self, date: NaiveDate, rates: CurrencyRates) -> i32 {
        let mut tables = self.tables.lock().unwrap();
        tables.next_rate_id += 1;
        let rate_id = tables.next_rate_id;
        tables.rates.insert(date, StoredRate { rate_id, rates });
        rate_id
    }
}

impl RecordStore for MemoryStore {
    async fn insert_deal(&self, deal: &NewDealModel) -> Result<InsertOutcome, PersistenceError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.deals.contains_key(&deal.deal_number) {
            return Ok(InsertOutcome::Skipped);
        }
        tables.deals.insert(deal.deal_number, deal.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn insert_order(&self, order: &NewOrderModel) -> Result<InsertOutcome, PersistenceError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.orders.contains_key(&order.order_number) {
            return Ok(InsertOutcome::Skipped);
        }
        tables.orders.insert(order.order_number, order.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn insert_exchange_rate(
        &self,
        rate: &NewExchangeRateModel,
    ) -> Result<InsertOutcome, PersistenceError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.rates.contains_key(&rate.rate_date) {
            return Ok(InsertOutcome::Skipped);
        }
        tables.next_rate_id += 1;
        let rate_id = tables.next_rate_id;
        tables.rates.insert(
            rate.rate_date,
            StoredRate {
                rate_id,
                rates: rate.rates.clone(),
            },
        );
        Ok(InsertOutcome::Inserted)
    }

    async fn exchange_rate_exists(&self, rate_date: NaiveDate) -> Result<bool, PersistenceError> {
        Ok(self.tables.lock().unwrap().rates.contains_key(&rate_date))
    }

    async fn empty_exchange_rates(&self) -> Result<Vec<EmptyRateRecord>, PersistenceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .rates
            .iter()
            .filter(|(_, stored)| stored.rates.is_empty())
            .map(|(date, stored)| EmptyRateRecord {
                rate_id: stored.rate_id,
                rate_date: *date,
            })
            .collect())
    }

    async fn fill_exchange_rate(
        &self,
        rate_id: i32,
        rates: &CurrencyRates,
    ) -> Result<bool, PersistenceError> {
        if *self.broken_fill.lock().unwrap() == Some(rate_id) {
            return Err(PersistenceError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .rates
            .values_mut()
            .find(|stored| stored.rate_id == rate_id && stored.rates.is_empty());
        match row {
            Some(stored) => {
                stored.rates = rates.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Serves canned USD quotes; dates without a quote fail with an empty listing.
#[derive(Default)]
pub struct FakeRates {
    quotes: HashMap<NaiveDate, Decimal>,
    requested: Mutex<Vec<NaiveDate>>,
}

impl FakeRates {
    pub fn with_quote(mut self, date: NaiveDate, usd: Decimal) -> Self {
        self.quotes.insert(date, usd);
        self
    }

    pub fn requested(&self) -> Vec<NaiveDate> {
        self.requested.lock().unwrap().clone()
    }
}

impl RateSource for FakeRates {
    async fn fetch_rates(&self, date: NaiveDate) -> Result<RateTable, FetchError> {
        self.requested.lock().unwrap().push(date);
        let usd = self
            .quotes
            .get(&date)
            .copied()
            .ok_or(FetchError::EmptyListing { date })?;
        let mut table = RateTable::new(date);
        table.insert("USD", usd);
        Ok(table)
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    Table::from_records(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|value| Cell::from_text(value)).collect())
            .collect(),
    )
}
