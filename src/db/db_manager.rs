use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{debug, info};

use super::connection;
use super::schema;
use super::queries::{
    deals as deals_queries,
    orders as orders_queries,
    exchange_rates as exchange_rates_queries,
};
use super::models::{
    deals::NewDealModel,
    orders::NewOrderModel,
    exchange_rates::{EmptyRateRecord, ExchangeRateModel, NewExchangeRateModel},
};
use crate::config::Config;
use crate::errors::PersistenceError;
use crate::exchange_rates::CurrencyRates;
use crate::ingestion::store::{InsertOutcome, RecordStore};

pub struct DbManager {
    pub pool: PgPool,
}

impl DbManager {
    /// Opens the pool and makes sure the tables exist
    pub async fn init(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = connection::create_pool(config).await?;
        info!(host = %config.database.host, database = %config.database.database, "Connected to database");

        schema::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn exchange_rate(&self, rate_date: NaiveDate) -> Result<Option<ExchangeRateModel>, PersistenceError> {
        Ok(exchange_rates_queries::get_exchange_rate_by_date(&self.pool, rate_date).await?)
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Database pool closed");
    }
}

impl RecordStore for DbManager {
    async fn insert_deal(&self, deal: &NewDealModel) -> Result<InsertOutcome, PersistenceError> {
        let rows = deals_queries::insert_deal_if_absent(&self.pool, deal).await?;
        Ok(InsertOutcome::from_rows_affected(rows))
    }

    async fn insert_order(&self, order: &NewOrderModel) -> Result<InsertOutcome, PersistenceError> {
        let rows = orders_queries::insert_order_if_absent(&self.pool, order).await?;
        Ok(InsertOutcome::from_rows_affected(rows))
    }

    async fn insert_exchange_rate(
        &self,
        rate: &NewExchangeRateModel,
    ) -> Result<InsertOutcome, PersistenceError> {
        let rows = exchange_rates_queries::insert_exchange_rate_if_absent(&self.pool, rate).await?;
        Ok(InsertOutcome::from_rows_affected(rows))
    }

    async fn exchange_rate_exists(&self, rate_date: NaiveDate) -> Result<bool, PersistenceError> {
        Ok(exchange_rates_queries::exchange_rate_exists(&self.pool, rate_date).await?)
    }

    async fn empty_exchange_rates(&self) -> Result<Vec<EmptyRateRecord>, PersistenceError> {
        Ok(exchange_rates_queries::get_empty_exchange_rates(&self.pool).await?)
    }

    async fn fill_exchange_rate(
        &self,
        rate_id: i32,
        rates: &CurrencyRates,
    ) -> Result<bool, PersistenceError> {
        let rows = exchange_rates_queries::fill_exchange_rate(&self.pool, rate_id, rates).await?;
        Ok(rows > 0)
    }
}
