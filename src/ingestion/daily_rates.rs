use chrono::NaiveDate;
use tracing::{info, instrument};

use super::store::{InsertOutcome, RecordStore};
use crate::db::models::exchange_rates::NewExchangeRateModel;
use crate::errors::DailyRateError;
use crate::exchange_rates::{RateSource, RateTable};

#[derive(Debug, Clone, PartialEq)]
pub enum DailyRateOutcome {
    /// A row for the date was already stored; nothing was fetched.
    AlreadyPresent,
    Inserted(RateTable),
    /// Another run stored the date between our check and our insert.
    LostRace(RateTable),
}

/// Stores the rates for `rate_date` once.
///
/// A fetch failure returns before anything is written.
#[instrument(skip(store, source), fields(on_close = true))]
pub async fn load_daily_rates<S: RecordStore, R: RateSource>(
    store: &S,
    source: &R,
    rate_date: NaiveDate,
) -> Result<DailyRateOutcome, DailyRateError> {
    if store.exchange_rate_exists(rate_date).await? {
        info!(%rate_date, "Rates already stored, nothing to do");
        return Ok(DailyRateOutcome::AlreadyPresent);
    }

    let table = source.fetch_rates(rate_date).await?;
    info!(%rate_date, %table, "Fetched rates");

    let record = NewExchangeRateModel {
        rate_date,
        rates: table.currency_rates(),
    };
    match store.insert_exchange_rate(&record).await? {
        InsertOutcome::Inserted => Ok(DailyRateOutcome::Inserted(table)),
        InsertOutcome::Skipped => Ok(DailyRateOutcome::LostRace(table)),
    }
}
