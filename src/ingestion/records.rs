use std::collections::BTreeSet;
use std::path::Path;

use eyre::WrapErr;
use tracing::{debug, info, instrument, warn};

use super::store::{InsertOutcome, RecordStore};
use super::summary::IngestionSummary;
use crate::config::Config;
use crate::data_ingestion::normalizer::{NormalizedRecord, RecordSchema};
use crate::data_ingestion::spreadsheet::{self, Table};
use crate::db::db_manager::DbManager;
use crate::db::models::exchange_rates::NewExchangeRateModel;
use crate::errors::{LoadError, PersistenceError};

/// Reads an export and checks it has every column `schema` needs.
pub fn load_table(path: &Path, delimiter: Option<u8>, schema: RecordSchema) -> Result<Table, LoadError> {
    let table = spreadsheet::read_table(path, delimiter)?;
    let missing = table.missing_columns(schema.required_columns());
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.display().to_string(),
            columns: missing,
        });
    }
    Ok(table)
}

/// Normalizes and stores every row of `table`.
///
/// Malformed rows are logged and counted, never fatal. Storage errors abort the run.
/// For deals, each distinct trade date also gets a placeholder `exchange_rates` row.
#[instrument(skip(store, table, schema), fields(kind = schema.name(), rows = table.len(), on_close = true))]
pub async fn ingest_table<S: RecordStore>(
    store: &S,
    table: &Table,
    schema: RecordSchema,
) -> Result<IngestionSummary, PersistenceError> {
    let mut summary = IngestionSummary::new(table.len());
    let mut trade_dates = BTreeSet::new();

    for row in &table.rows {
        let record = match schema.normalize(row) {
            Ok(record) => record,
            Err(e) => {
                warn!(row = row.index, error = %e, "Skipping malformed row");
                summary.errored += 1;
                continue;
            }
        };

        let outcome = match &record {
            NormalizedRecord::Deal(deal) => {
                if let Some(deal_time) = deal.deal_time {
                    trade_dates.insert(deal_time.date());
                }
                store.insert_deal(deal).await?
            }
            NormalizedRecord::Order(order) => store.insert_order(order).await?,
        };

        match outcome {
            InsertOutcome::Inserted => summary.inserted += 1,
            InsertOutcome::Skipped => {
                debug!(row = row.index, key = record.natural_key(), "Already stored");
                summary.skipped += 1;
            }
        }
    }

    for rate_date in trade_dates {
        let placeholder = NewExchangeRateModel::placeholder(rate_date);
        if store.insert_exchange_rate(&placeholder).await? == InsertOutcome::Inserted {
            debug!(%rate_date, "Created placeholder rate row");
            summary.rate_placeholders += 1;
        }
    }

    info!(
        total = summary.total,
        inserted = summary.inserted,
        skipped = summary.skipped,
        errored = summary.errored,
        rate_placeholders = summary.rate_placeholders,
        "Ingestion finished"
    );
    Ok(summary)
}

/// Full loader run: read and check the export, then store it.
///
/// The file is validated before connecting so a bad export never touches the database.
/// The pool is closed whether or not ingestion succeeds.
pub async fn run_file_load(
    config: &Config,
    path: &Path,
    delimiter: Option<u8>,
    schema: RecordSchema,
) -> eyre::Result<IngestionSummary> {
    let table = load_table(path, delimiter, schema)?;
    info!(path = %path.display(), rows = table.len(), "Export read");

    let db = DbManager::init(config).await.wrap_err("Failed to initialize database")?;
    let result = ingest_table(&db, &table, schema).await;
    db.close().await;

    Ok(result?)
}
