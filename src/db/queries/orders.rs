use sqlx::PgPool;

use crate::db::models::orders::NewOrderModel;

/// Insert an order unless its order number is already stored. Returns rows affected (0 or 1).
pub async fn insert_order_if_absent(pool: &PgPool, order: &NewOrderModel) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO orders (
            order_number, status, operation, ticker, price, qty, amount,
            qty_remaining, order_type, order_condition, expiry, order_date
        )
        VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
        ON CONFLICT (order_number) DO NOTHING
        "#,
    )
    .bind(order.order_number)
    .bind(order.status.as_deref())
    .bind(order.operation.as_deref())
    .bind(order.ticker.as_deref())
    .bind(order.price)
    .bind(order.qty)
    .bind(order.amount)
    .bind(order.qty_remaining)
    .bind(order.order_type.as_deref())
    .bind(order.order_condition)
    .bind(order.expiry.as_deref())
    .bind(order.order_date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
