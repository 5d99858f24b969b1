use sqlx::ConnectOptions;
use sqlx::postgres::{
    PgConnectOptions,
    PgPool,
    PgPoolOptions,
};
use std::time::Duration;
use tracing::log::LevelFilter;

use crate::config::Config;

pub fn connect_options(config: &Config) -> PgConnectOptions {
    let db = &config.database;
    PgConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .username(&db.user)
        .password(&db.password)
        .database(&db.database)
        .log_slow_statements(LevelFilter::Warn, Duration::from_secs(60))
}

// Loaders run sequentially, one connection is enough
pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options(config))
        .await
}
