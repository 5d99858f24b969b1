pub mod config;
pub mod logging;
pub mod errors;
pub mod data_ingestion;
pub mod exchange_rates;
pub mod ingestion;
pub mod db;
