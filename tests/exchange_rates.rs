mod common;

use std::future;
use std::time::Duration;

use rust_decimal::dec;

use common::{FakeRates, MemoryStore, day};
use invest_loaders::errors::{DailyRateError, PersistenceError};
use invest_loaders::exchange_rates::CurrencyRates;
use invest_loaders::ingestion::backfill::{BackfillStatus, backfill_rates};
use invest_loaders::ingestion::daily_rates::{DailyRateOutcome, load_daily_rates};

fn usd(rate: rust_decimal::Decimal) -> CurrencyRates {
    CurrencyRates {
        usd: Some(rate),
        ..Default::default()
    }
}

#[tokio::test]
async fn daily_load_inserts_a_new_date() {
    let store = MemoryStore::default();
    let source = FakeRates::default().with_quote(day(2024, 3, 14), dec!(92.5));

    let outcome = load_daily_rates(&store, &source, day(2024, 3, 14)).await.unwrap();

    assert!(matches!(outcome, DailyRateOutcome::Inserted(_)));
    assert_eq!(store.rate(day(2024, 3, 14)).unwrap().rates, usd(dec!(92.5)));
}

#[tokio::test]
async fn daily_load_is_a_no_op_when_the_date_exists() {
    let store = MemoryStore::default();
    store.seed_rate(day(2024, 3, 14), CurrencyRates::default());
    let source = FakeRates::default().with_quote(day(2024, 3, 14), dec!(92.5));

    let outcome = load_daily_rates(&store, &source, day(2024, 3, 14)).await.unwrap();

    assert_eq!(outcome, DailyRateOutcome::AlreadyPresent);
    assert!(source.requested().is_empty());
    assert!(store.rate(day(2024, 3, 14)).unwrap().rates.is_empty());
}

#[tokio::test]
async fn daily_load_writes_nothing_when_the_fetch_fails() {
    let store = MemoryStore::default();
    let source = FakeRates::default();

    let err = load_daily_rates(&store, &source, day(2024, 3, 14)).await.unwrap_err();

    assert!(matches!(err, DailyRateError::Fetch(_)));
    assert!(store.rate_dates().is_empty());
}

#[tokio::test]
async fn backfill_fills_only_empty_rows() {
    let store = MemoryStore::default();
    let complete = usd(dec!(90));
    store.seed_rate(day(2024, 2, 5), CurrencyRates::default());
    store.seed_rate(day(2024, 2, 6), complete.clone());
    store.seed_rate(day(2024, 2, 7), CurrencyRates::default());
    let source = FakeRates::default()
        .with_quote(day(2024, 2, 5), dec!(91))
        .with_quote(day(2024, 2, 6), dec!(99))
        .with_quote(day(2024, 2, 7), dec!(92));

    let report = backfill_rates(&store, &source, Duration::ZERO, future::pending::<()>())
        .await
        .unwrap();

    assert_eq!(report.pending, 2);
    assert_eq!(report.filled(), 2);
    assert!(!report.interrupted);
    assert_eq!(source.requested(), vec![day(2024, 2, 5), day(2024, 2, 7)]);
    assert_eq!(store.rate(day(2024, 2, 5)).unwrap().rates, usd(dec!(91)));
    assert_eq!(store.rate(day(2024, 2, 6)).unwrap().rates, complete);
    assert_eq!(store.rate_dates().len(), 3);
}

#[tokio::test]
async fn backfill_continues_past_failures() {
    let store = MemoryStore::default();
    let failing_id = store.seed_rate(day(2024, 2, 5), CurrencyRates::default());
    store.seed_rate(day(2024, 2, 7), CurrencyRates::default());
    let source = FakeRates::default().with_quote(day(2024, 2, 7), dec!(92));

    let report = backfill_rates(&store, &source, Duration::ZERO, future::pending::<()>())
        .await
        .unwrap();

    assert_eq!(report.failed(), 1);
    assert_eq!(report.filled(), 1);
    let failed = &report.entries[0];
    assert_eq!(failed.rate_id, failing_id);
    assert!(matches!(failed.status, BackfillStatus::Failed(_)));
    assert!(failed.to_string().starts_with(&format!("rate_id: {failing_id}, rate_date: 2024-02-05, error: ")));
    assert!(store.rate(day(2024, 2, 5)).unwrap().rates.is_empty());

    let filled = report.entries[1].to_string();
    assert!(filled.ends_with("updated_rates: RUR=1, USD=92, GBP=null, EUR=null, KZT=null"));
}

#[tokio::test]
async fn storage_failure_keeps_the_rows_already_filled() {
    let store = MemoryStore::default();
    store.seed_rate(day(2024, 2, 5), CurrencyRates::default());
    let broken_id = store.seed_rate(day(2024, 2, 6), CurrencyRates::default());
    store.seed_rate(day(2024, 2, 7), CurrencyRates::default());
    store.break_fill_for(broken_id);
    let source = FakeRates::default()
        .with_quote(day(2024, 2, 5), dec!(91))
        .with_quote(day(2024, 2, 6), dec!(91.5))
        .with_quote(day(2024, 2, 7), dec!(92));

    let err = backfill_rates(&store, &source, Duration::ZERO, future::pending::<()>())
        .await
        .unwrap_err();

    assert!(matches!(err.source, PersistenceError::Database(_)));
    assert_eq!(err.report.pending, 3);
    assert_eq!(err.report.filled(), 1);
    assert_eq!(err.report.entries[0].rate_date, day(2024, 2, 5));
    assert_eq!(store.rate(day(2024, 2, 5)).unwrap().rates, usd(dec!(91)));
    assert_eq!(source.requested(), vec![day(2024, 2, 5), day(2024, 2, 6)]);

    let path = std::env::temp_dir().join(format!("backfill_partial_{}.txt", std::process::id()));
    err.report.write_to(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(written.lines().count(), 1);
    assert!(written.starts_with("rate_id: 1, rate_date: 2024-02-05, updated_rates: "));
}

#[tokio::test]
async fn backfill_stops_when_shutdown_arrives_during_the_pause() {
    let store = MemoryStore::default();
    store.seed_rate(day(2024, 2, 5), CurrencyRates::default());
    store.seed_rate(day(2024, 2, 7), CurrencyRates::default());
    let source = FakeRates::default()
        .with_quote(day(2024, 2, 5), dec!(91))
        .with_quote(day(2024, 2, 7), dec!(92));

    let report = backfill_rates(&store, &source, Duration::from_secs(3600), future::ready(()))
        .await
        .unwrap();

    assert!(report.interrupted);
    assert_eq!(report.pending, 2);
    assert_eq!(report.entries.len(), 1);
    assert_eq!(source.requested(), vec![day(2024, 2, 5)]);
    assert!(store.rate(day(2024, 2, 7)).unwrap().rates.is_empty());
}

#[tokio::test]
async fn backfill_with_nothing_pending_fetches_nothing() {
    let store = MemoryStore::default();
    store.seed_rate(day(2024, 2, 6), usd(dec!(90)));
    let source = FakeRates::default();

    let report = backfill_rates(&store, &source, Duration::ZERO, future::pending::<()>())
        .await
        .unwrap();

    assert_eq!(report.pending, 0);
    assert!(report.entries.is_empty());
    assert!(source.requested().is_empty());
}

#[tokio::test]
async fn report_file_has_one_line_per_row() {
    let store = MemoryStore::default();
    store.seed_rate(day(2024, 2, 5), CurrencyRates::default());
    store.seed_rate(day(2024, 2, 7), CurrencyRates::default());
    let source = FakeRates::default().with_quote(day(2024, 2, 7), dec!(92));

    let report = backfill_rates(&store, &source, Duration::ZERO, future::pending::<()>())
        .await
        .unwrap();
    let path = std::env::temp_dir().join(format!("backfill_report_{}.txt", std::process::id()));
    report.write_to(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(written.lines().count(), 2);
}
