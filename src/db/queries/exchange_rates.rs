use chrono::NaiveDate;
use sqlx::PgPool;

use crate::db::models::exchange_rates::{EmptyRateRecord, ExchangeRateModel, NewExchangeRateModel};
use crate::exchange_rates::CurrencyRates;

/// Insert a rate row unless one exists for that date. `rur` takes its column default of 1.
pub async fn insert_exchange_rate_if_absent(
    pool: &PgPool,
    rate: &NewExchangeRateModel,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO exchange_rates (rate_date, usd, gbp, eur, kzt)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (rate_date) DO NOTHING
        "#,
    )
    .bind(rate.rate_date)
    .bind(rate.rates.usd)
    .bind(rate.rates.gbp)
    .bind(rate.rates.eur)
    .bind(rate.rates.kzt)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn exchange_rate_exists(pool: &PgPool, rate_date: NaiveDate) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM exchange_rates WHERE rate_date = $1)",
    )
    .bind(rate_date)
    .fetch_one(pool)
    .await
}

pub async fn get_exchange_rate_by_date(
    pool: &PgPool,
    rate_date: NaiveDate,
) -> Result<Option<ExchangeRateModel>, sqlx::Error> {
    sqlx::query_as::<_, ExchangeRateModel>(
        r#"
        SELECT rate_id, rate_date, rur, usd, gbp, eur, kzt
        FROM exchange_rates
        WHERE rate_date = $1
        "#,
    )
    .bind(rate_date)
    .fetch_optional(pool)
    .await
}

/// Placeholder rows: every foreign currency column still null
pub async fn get_empty_exchange_rates(pool: &PgPool) -> Result<Vec<EmptyRateRecord>, sqlx::Error> {
    sqlx::query_as::<_, EmptyRateRecord>(
        r#"
        SELECT rate_id, rate_date
        FROM exchange_rates
        WHERE usd IS NULL AND gbp IS NULL AND eur IS NULL AND kzt IS NULL
        ORDER BY rate_date ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Fill a placeholder row in place. The emptiness guard keeps completed rows untouched.
pub async fn fill_exchange_rate(
    pool: &PgPool,
    rate_id: i32,
    rates: &CurrencyRates,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE exchange_rates
        SET usd = $1, gbp = $2, eur = $3, kzt = $4
        WHERE rate_id = $5
          AND usd IS NULL AND gbp IS NULL AND eur IS NULL AND kzt IS NULL
        "#,
    )
    .bind(rates.usd)
    .bind(rates.gbp)
    .bind(rates.eur)
    .bind(rates.kzt)
    .bind(rate_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
