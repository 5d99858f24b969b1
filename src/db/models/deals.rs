use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::data_ingestion::coerce::{CurrencyCode, DealType};

/// A normalized trade confirmation row, ready for `insert_deal`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDealModel {
    pub deal_number: i64,
    pub order_number: Option<i64>,
    pub deal_time: Option<NaiveDateTime>,
    pub ticker: Option<String>,
    pub deal_type: Option<DealType>,
    pub price: Option<Decimal>,
    pub qty: Option<i64>,
    pub amount: Option<Decimal>,
    pub commission: Option<Decimal>,
    pub commission_currency: Option<CurrencyCode>,
    pub profit: Option<Decimal>,
    pub profit_currency: Option<CurrencyCode>,
}
