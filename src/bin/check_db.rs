use dotenvy::dotenv;
use eyre::{Result, WrapErr};

use invest_loaders::logging;
use invest_loaders::config;
use invest_loaders::db::connection;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let cfg = config::Config::load()?;
    let db = &cfg.database;
    println!("Host: {}:{}, user: {}, database: {}", db.host, db.port, db.user, db.database);

    let pool = connection::create_pool(&cfg)
        .await
        .wrap_err("Could not connect to the database")?;
    let version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(&pool)
        .await
        .wrap_err("Connected, but a test query failed")?;
    pool.close().await;

    println!("Connection established: {version}");
    Ok(())
}
