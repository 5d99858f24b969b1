use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::exchange_rates::CurrencyRates;

/// Rates are RUB per one unit of the foreign currency; `rur` is always 1.
#[derive(Debug, Clone, FromRow)]
pub struct ExchangeRateModel {
    pub rate_id: i32,
    pub rate_date: NaiveDate,
    pub rur: Decimal,
    pub usd: Option<Decimal>,
    pub gbp: Option<Decimal>,
    pub eur: Option<Decimal>,
    pub kzt: Option<Decimal>,
}

impl ExchangeRateModel {
    pub fn is_placeholder(&self) -> bool {
        self.usd.is_none() && self.gbp.is_none() && self.eur.is_none() && self.kzt.is_none()
    }
}

/// A rate row still waiting for the backfill pass.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct EmptyRateRecord {
    pub rate_id: i32,
    pub rate_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExchangeRateModel {
    pub rate_date: NaiveDate,
    pub rates: CurrencyRates,
}

impl NewExchangeRateModel {
    /// Date-only row created when a deal is seen for a day with no rates yet.
    pub fn placeholder(rate_date: NaiveDate) -> Self {
        Self {
            rate_date,
            rates: CurrencyRates::default(),
        }
    }
}
