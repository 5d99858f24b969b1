use dotenvy::dotenv;
use eyre::Result;
use tracing::info;

use invest_loaders::logging;
use invest_loaders::config;
use invest_loaders::db::{
    connection,
    schema,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let cfg = config::Config::load()?;
    info!(host = %cfg.database.host, database = %cfg.database.database, "Configuration loaded and logging initialized");

    // Initialize database connection pool
    let pool = connection::create_pool(&cfg).await?;
    info!("Database connection pool created");

    // Initialize database schema
    let result = schema::init_schema(&pool).await;
    pool.close().await;
    result?;
    info!("Database schema initialized");

    Ok(())
}
