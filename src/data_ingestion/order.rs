use super::coerce::{self, DateTimePattern};
use super::normalizer::{column, required};
use super::spreadsheet::RawRow;
use crate::db::models::orders::NewOrderModel;
use crate::errors::RowError;

pub const STATUS: &str = "Статус";
pub const OPERATION: &str = "Операция";
pub const TICKER: &str = "Тикер";
pub const PRICE: &str = "Цена";
pub const QUANTITY: &str = "Количество";
pub const AMOUNT: &str = "Сумма";
pub const REMAINING: &str = "Остаток";
pub const ORDER_TYPE: &str = "Тип приказа";
pub const CONDITION: &str = "Условие";
pub const EXPIRY: &str = "Срок";
pub const TIME: &str = "Время";
pub const ORDER_NUMBER: &str = "№ приказа";

pub const REQUIRED_COLUMNS: [&str; 12] = [
    STATUS, OPERATION, TICKER, PRICE, QUANTITY, AMOUNT, REMAINING, ORDER_TYPE, CONDITION, EXPIRY,
    TIME, ORDER_NUMBER,
];

pub fn normalize_order(row: &RawRow) -> Result<NewOrderModel, RowError> {
    let condition = row.get(CONDITION);
    let order_condition = if coerce::is_dash(condition) {
        None
    } else {
        column(row, CONDITION, coerce::decimal)?
    };

    Ok(NewOrderModel {
        order_number: required(row, ORDER_NUMBER, coerce::integer)?,
        status: coerce::text(row.get(STATUS)),
        operation: coerce::text(row.get(OPERATION)),
        ticker: coerce::text(row.get(TICKER)),
        price: column(row, PRICE, coerce::decimal)?,
        qty: column(row, QUANTITY, coerce::integer)?,
        amount: column(row, AMOUNT, coerce::decimal)?,
        qty_remaining: column(row, REMAINING, coerce::integer)?,
        order_type: coerce::text(row.get(ORDER_TYPE)),
        order_condition,
        expiry: coerce::text(row.get(EXPIRY)),
        order_date: column(row, TIME, |c| coerce::date_time(c, DateTimePattern::YearMonthDay))?,
    })
}
