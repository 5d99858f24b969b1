use std::fmt;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::store::RecordStore;
use crate::errors::PersistenceError;
use crate::exchange_rates::{RateSource, RateTable};

#[derive(Debug, Clone, PartialEq)]
pub enum BackfillStatus {
    Filled(RateTable),
    /// The row gained rates after it was selected; left untouched.
    AlreadyFilled,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackfillEntry {
    pub rate_id: i32,
    pub rate_date: NaiveDate,
    pub status: BackfillStatus,
}

impl fmt::Display for BackfillEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rate_id: {}, rate_date: {}, ", self.rate_id, self.rate_date)?;
        match &self.status {
            BackfillStatus::Filled(table) => write!(f, "updated_rates: {table}"),
            BackfillStatus::AlreadyFilled => write!(f, "skipped: already filled"),
            BackfillStatus::Failed(message) => write!(f, "error: {message}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackfillReport {
    pub entries: Vec<BackfillEntry>,
    /// Number of empty rows found before the pass started.
    pub pending: usize,
    /// Set when shutdown arrived during a pause; later rows were not attempted.
    pub interrupted: bool,
}

impl BackfillReport {
    pub fn filled(&self) -> usize {
        self.count(|s| matches!(s, BackfillStatus::Filled(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, BackfillStatus::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&BackfillStatus) -> bool) -> usize {
        self.entries.iter().filter(|e| predicate(&e.status)).count()
    }

    /// One line per processed row.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(&entry.to_string());
            content.push('\n');
        }
        std::fs::write(path, content)
    }
}

/// Storage failure during a pass, carrying the rows handled before it.
#[derive(Debug, Error)]
#[error("backfill stopped after {} rows: {source}", .report.entries.len())]
pub struct BackfillError {
    pub report: BackfillReport,
    #[source]
    pub source: PersistenceError,
}

/// Fetches rates for every placeholder row and fills it in place.
///
/// Waits `delay` between fetches; resolving `shutdown` during a wait stops the
/// pass. Fetch failures are recorded and the pass continues; storage errors abort it
/// and hand back the partial report.
#[instrument(skip(store, source, shutdown), fields(on_close = true))]
pub async fn backfill_rates<S, R, F>(
    store: &S,
    source: &R,
    delay: Duration,
    shutdown: F,
) -> Result<BackfillReport, BackfillError>
where
    S: RecordStore,
    R: RateSource,
    F: Future<Output = ()>,
{
    let records = store
        .empty_exchange_rates()
        .await
        .map_err(|source| BackfillError {
            report: BackfillReport::default(),
            source,
        })?;
    let mut report = BackfillReport {
        pending: records.len(),
        ..BackfillReport::default()
    };
    if records.is_empty() {
        info!("No rate rows are waiting for rates");
        return Ok(report);
    }
    info!(pending = records.len(), "Backfilling empty rate rows");

    tokio::pin!(shutdown);
    for (position, record) in records.iter().enumerate() {
        if position > 0 && !delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut shutdown => {
                    warn!(remaining = records.len() - position, "Shutdown requested, stopping backfill");
                    report.interrupted = true;
                    break;
                }
            }
        }

        let status = match source.fetch_rates(record.rate_date).await {
            Ok(table) => {
                let filled = match store.fill_exchange_rate(record.rate_id, &table.currency_rates()).await {
                    Ok(filled) => filled,
                    Err(source) => {
                        error!(rate_id = record.rate_id, error = %source, "Storage failed, stopping backfill");
                        return Err(BackfillError { report, source });
                    }
                };
                if filled {
                    info!(rate_id = record.rate_id, rate_date = %record.rate_date, %table, "Filled rates");
                    BackfillStatus::Filled(table)
                } else {
                    warn!(rate_id = record.rate_id, "Row already has rates, left unchanged");
                    BackfillStatus::AlreadyFilled
                }
            }
            Err(e) => {
                error!(rate_id = record.rate_id, rate_date = %record.rate_date, error = %e, "Failed to fetch rates");
                BackfillStatus::Failed(e.to_string())
            }
        };

        report.entries.push(BackfillEntry {
            rate_id: record.rate_id,
            rate_date: record.rate_date,
            status,
        });
    }

    info!(
        filled = report.filled(),
        failed = report.failed(),
        interrupted = report.interrupted,
        "Backfill finished"
    );
    Ok(report)
}
