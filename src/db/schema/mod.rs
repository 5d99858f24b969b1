use sqlx::{
    Executor,
    postgres::PgPool,
};

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(include_str!("deals.sql")).await?;
    pool.execute(include_str!("orders.sql")).await?;
    pool.execute(include_str!("exchange_rates.sql")).await?;

    // Backfill scans for rows with no rates yet
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_exchange_rates_empty
        ON exchange_rates(rate_date)
        WHERE usd IS NULL AND gbp IS NULL AND eur IS NULL AND kzt IS NULL;
        "#
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_deals_deal_time
        ON deals(deal_time);
        "#
    )
    .execute(pool)
    .await?;

    Ok(())
}
