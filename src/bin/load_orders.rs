use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;
use eyre::WrapErr;
use tracing::info;

use invest_loaders::config;
use invest_loaders::logging;
use invest_loaders::data_ingestion::normalizer::RecordSchema;
use invest_loaders::ingestion::records;

/// Load a broker order history export into the `orders` table.
#[derive(Debug, Parser)]
#[command(name = "load_orders")]
struct Args {
    /// Order history export (.xlsx, .xls, .ods, or delimited text)
    file: PathBuf,

    /// Field delimiter for text exports; detected from the header line when omitted
    #[arg(long)]
    delimiter: Option<char>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file, if any
    dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let cfg = config::Config::load()?;
    let delimiter = args
        .delimiter
        .map(u8::try_from)
        .transpose()
        .wrap_err("Delimiter must be a single ASCII character")?;
    info!(file = %args.file.display(), "Loading orders");

    let summary = records::run_file_load(&cfg, &args.file, delimiter, RecordSchema::Order).await?;

    println!("Processed file: {}", args.file.display());
    println!("{summary}");
    Ok(())
}
