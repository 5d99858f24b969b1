use chrono::NaiveDateTime;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderModel {
    pub order_number: i64,
    pub status: Option<String>,
    pub operation: Option<String>,
    pub ticker: Option<String>,
    pub price: Option<Decimal>,
    pub qty: Option<i64>,
    pub amount: Option<Decimal>,
    pub qty_remaining: Option<i64>,
    pub order_type: Option<String>,
    pub order_condition: Option<Decimal>, // trigger price; None when the export shows "-"
    pub expiry: Option<String>,
    pub order_date: Option<NaiveDateTime>,
}
