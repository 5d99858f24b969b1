use sqlx::PgPool;

use crate::db::models::deals::NewDealModel;

/// Insert a deal unless its deal number is already stored. Returns rows affected (0 or 1).
pub async fn insert_deal_if_absent(pool: &PgPool, deal: &NewDealModel) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO deals (
            deal_number, order_number, deal_time, ticker, deal_type, price, qty,
            amount, commission, commission_currency, profit, profit_currency
        )
        VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
        ON CONFLICT (deal_number) DO NOTHING
        "#,
    )
    .bind(deal.deal_number)
    .bind(deal.order_number)
    .bind(deal.deal_time)
    .bind(deal.ticker.as_deref())
    .bind(deal.deal_type.map(|t| t.as_str()))
    .bind(deal.price)
    .bind(deal.qty)
    .bind(deal.amount)
    .bind(deal.commission)
    .bind(deal.commission_currency.map(|c| c.as_str()))
    .bind(deal.profit)
    .bind(deal.profit_currency.map(|c| c.as_str()))
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
