pub mod cbr_types;
pub mod cbr_client;

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::FetchError;

/// The ruble; every rate is quoted against it.
pub const BASE_CURRENCY: &str = "RUR";

/// Currencies persisted in `exchange_rates`, besides the base.
pub const TRACKED_CURRENCIES: [&str; 4] = ["USD", "GBP", "EUR", "KZT"];

/// Rates for one day: currency code to RUB per one unit of that currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    date: NaiveDate,
    rates: BTreeMap<String, Decimal>,
}

impl RateTable {
    pub fn new(date: NaiveDate) -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(BASE_CURRENCY.to_string(), Decimal::ONE);
        Self { date, rates }
    }

    /// The base currency stays pinned at 1.
    pub fn insert(&mut self, code: &str, rate: Decimal) {
        if code != BASE_CURRENCY {
            self.rates.insert(code.to_string(), rate);
        }
    }

    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn currency_rates(&self) -> CurrencyRates {
        CurrencyRates {
            usd: self.get("USD"),
            gbp: self.get("GBP"),
            eur: self.get("EUR"),
            kzt: self.get("KZT"),
        }
    }
}

impl fmt::Display for RateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tracked = std::iter::once(BASE_CURRENCY).chain(TRACKED_CURRENCIES);
        let parts: Vec<String> = tracked
            .map(|code| match self.get(code) {
                Some(rate) => format!("{code}={rate}"),
                None => format!("{code}=null"),
            })
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// The nullable currency columns of an `exchange_rates` row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyRates {
    pub usd: Option<Decimal>,
    pub gbp: Option<Decimal>,
    pub eur: Option<Decimal>,
    pub kzt: Option<Decimal>,
}

impl CurrencyRates {
    pub fn is_empty(&self) -> bool {
        self.usd.is_none() && self.gbp.is_none() && self.eur.is_none() && self.kzt.is_none()
    }
}

/// Anything that can produce a day's rate table.
#[allow(async_fn_in_trait)]
pub trait RateSource {
    async fn fetch_rates(&self, date: NaiveDate) -> Result<RateTable, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    #[test]
    fn base_currency_is_always_one() {
        let mut table = RateTable::new(day());
        table.insert("RUR", dec!(2));
        table.insert("USD", dec!(92.5));
        assert_eq!(table.get("RUR"), Some(Decimal::ONE));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn currency_rates_pick_tracked_codes() {
        let mut table = RateTable::new(day());
        table.insert("USD", dec!(92.5));
        table.insert("CNY", dec!(12.7));
        let rates = table.currency_rates();
        assert_eq!(rates.usd, Some(dec!(92.5)));
        assert_eq!(rates.kzt, None);
        assert!(!rates.is_empty());
        assert!(CurrencyRates::default().is_empty());
    }

    #[test]
    fn display_lists_tracked_codes() {
        let mut table = RateTable::new(day());
        table.insert("USD", dec!(92.5));
        assert_eq!(table.to_string(), "RUR=1, USD=92.5, GBP=null, EUR=null, KZT=null");
    }
}
