pub mod connection;
pub mod schema;
pub mod models;
pub mod queries;
pub mod db_manager;
