use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;
use eyre::WrapErr;
use tracing::{info, warn};

use invest_loaders::config;
use invest_loaders::logging;
use invest_loaders::db::db_manager::DbManager;
use invest_loaders::exchange_rates::cbr_client::CbrClient;
use invest_loaders::ingestion::backfill;

/// Fill rate rows that only carry a date (created by load_deals).
#[derive(Debug, Parser)]
#[command(name = "backfill_rates")]
struct Args {
    /// Where to write the per-row outcome report
    #[arg(long, default_value = "empty_rates_results.txt")]
    report: PathBuf,
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; never interrupt
        std::future::pending::<()>().await;
    }
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
    let client = CbrClient::new(&cfg)?;
    let db = DbManager::init(&cfg).await?;

    let result = backfill::backfill_rates(&db, &client, cfg.backfill_delay, shutdown_signal()).await;
    db.close().await;
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            // Rows already updated still get their report lines
            if !e.report.entries.is_empty() {
                e.report
                    .write_to(&args.report)
                    .wrap_err_with(|| format!("Failed to write report to {}", args.report.display()))?;
                warn!(path = %args.report.display(), written = e.report.entries.len(), "Partial report written");
            }
            return Err(e.into());
        }
    };

    if report.pending == 0 {
        println!("No rate rows are missing rates.");
        return Ok(());
    }
    println!("Rate rows missing rates: {}", report.pending);

    report
        .write_to(&args.report)
        .wrap_err_with(|| format!("Failed to write report to {}", args.report.display()))?;
    info!(path = %args.report.display(), "Report written");

    println!(
        "Filled: {}, failed: {}, report: {}",
        report.filled(),
        report.failed(),
        args.report.display()
    );
    if report.interrupted {
        warn!("Backfill was interrupted; rerun to continue");
    }
    Ok(())
}
