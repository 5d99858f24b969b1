pub mod deals;
pub mod orders;
pub mod exchange_rates;
