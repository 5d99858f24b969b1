use chrono::{Local, NaiveDate};
use clap::Parser;
use rust_decimal::Decimal;
use dotenvy::dotenv;
use tracing::info;

use invest_loaders::config;
use invest_loaders::logging;
use invest_loaders::db::db_manager::DbManager;
use invest_loaders::exchange_rates::cbr_client::CbrClient;
use invest_loaders::ingestion::daily_rates::{self, DailyRateOutcome};

/// Store the Central Bank rates for one day, once.
#[derive(Debug, Parser)]
#[command(name = "load_daily_rates")]
struct Args {
    /// Day to load (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    dotenv().ok();

    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let cfg = config::Config::load()?;
    let rate_date = args.date.unwrap_or_else(|| Local::now().date_naive());
    info!(%rate_date, "Loading daily rates");

    let client = CbrClient::new(&cfg)?;
    let db = DbManager::init(&cfg).await?;
    let result = daily_rates::load_daily_rates(&db, &client, rate_date).await;
    let stored = match &result {
        Ok(DailyRateOutcome::AlreadyPresent) => db.exchange_rate(rate_date).await.ok().flatten(),
        _ => None,
    };
    db.close().await;

    match result? {
        DailyRateOutcome::AlreadyPresent => match stored {
            Some(row) if row.is_placeholder() => {
                println!("A row for {rate_date} exists but has no rates yet; run backfill_rates to fill it.");
            }
            Some(row) => {
                let show = |rate: Option<Decimal>| rate.map_or("null".to_string(), |r| r.to_string());
                println!(
                    "Rates for {rate_date} are already stored (rate_id {}): USD={}, GBP={}, EUR={}, KZT={}",
                    row.rate_id,
                    show(row.usd),
                    show(row.gbp),
                    show(row.eur),
                    show(row.kzt)
                );
            }
            None => println!("Rates for {rate_date} are already stored, nothing to do."),
        },
        DailyRateOutcome::Inserted(table) => {
            println!("Stored rates for {rate_date}: {table}");
        }
        DailyRateOutcome::LostRace(table) => {
            println!("Rates for {rate_date} were stored concurrently; fetched {table} but kept the existing row.");
        }
    }
    Ok(())
}
