pub mod store;
pub mod summary;
pub mod records;
pub mod daily_rates;
pub mod backfill;
