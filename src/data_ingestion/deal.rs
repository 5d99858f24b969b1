use rust_decimal::Decimal;

use super::coerce::{self, DateTimePattern};
use super::normalizer::{column, required};
use super::spreadsheet::RawRow;
use crate::db::models::deals::NewDealModel;
use crate::errors::RowError;

pub const DEAL_NUMBER: &str = "№ сделки";
pub const ORDER_NUMBER: &str = "№ приказа";
pub const TIME: &str = "Время";
pub const TICKER: &str = "Тикер";
pub const OPERATION: &str = "Операция";
pub const PRICE: &str = "Цена";
pub const QUANTITY: &str = "Количество";
pub const AMOUNT: &str = "Сумма";
pub const COMMISSION: &str = "Комиссия";
pub const PROFIT: &str = "Прибыль";

pub const REQUIRED_COLUMNS: [&str; 10] = [
    DEAL_NUMBER, ORDER_NUMBER, TIME, TICKER, OPERATION, PRICE, QUANTITY, AMOUNT, COMMISSION, PROFIT,
];

pub fn normalize_deal(row: &RawRow) -> Result<NewDealModel, RowError> {
    let price = column(row, PRICE, coerce::decimal)?;
    if price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(RowError::InvalidValue {
            index: row.index,
            column: PRICE,
            reason: "price must not be negative".to_string(),
        });
    }

    Ok(NewDealModel {
        deal_number: required(row, DEAL_NUMBER, coerce::integer)?,
        order_number: column(row, ORDER_NUMBER, coerce::integer)?,
        deal_time: column(row, TIME, |c| coerce::date_time(c, DateTimePattern::DayMonthYear))?,
        ticker: coerce::text(row.get(TICKER)),
        deal_type: coerce::deal_type(row.get(OPERATION)),
        price,
        qty: column(row, QUANTITY, coerce::integer)?,
        amount: column(row, AMOUNT, coerce::decimal)?,
        commission: column(row, COMMISSION, coerce::amount)?,
        commission_currency: coerce::currency(row.get(COMMISSION)),
        profit: column(row, PROFIT, coerce::amount)?,
        profit_currency: coerce::currency(row.get(PROFIT)),
    })
}
