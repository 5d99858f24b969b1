// Logging setup: console always, JSON file optional, with run timing for flagged spans
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use eyre::{Result, WrapErr};
use tracing::field::{Field, Visit};
use tracing::{Id, Subscriber, info, span};
use tracing_subscriber::{
    EnvFilter,
    fmt,
    layer::{Context, Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const CRATE_TARGET: &str = "invest_loaders";

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Our library and the running binary log at `level`; everything else at `warn`.
fn crate_filter(level: &str, bin_target: &str) -> EnvFilter {
    EnvFilter::try_new(filter_directives(level, bin_target))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives("info", bin_target)))
}

fn filter_directives(level: &str, bin_target: &str) -> String {
    format!("warn,{CRATE_TARGET}={level},{bin_target}={level}")
}

/// Installs the global subscriber.
///
/// `CONSOLE_LOG_LEVEL` / `FILE_LOG_LEVEL` set our crate's level (other crates stay at `warn`);
/// `LOG_TO_FILE=true` adds `logs/<bin_name>_<timestamp>.log` in JSON.
pub fn init_logging(bin_name: String) -> Result<()> {
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let log_to_file = env::var("LOG_TO_FILE").map(|v| v == "true").unwrap_or(false);
    // Binary crates log under their own name, hyphens turned into underscores
    let bin_target = bin_name.replace('-', "_");

    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_filter(crate_filter(&console_log_level, &bin_target));

    let file_layer = if log_to_file {
        let log_dir = Path::new("logs");
        fs::create_dir_all(log_dir).wrap_err("Failed to create log directory")?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
        let file_appender =
            tracing_appender::rolling::never(log_dir, format!("{bin_name}_{timestamp}.log"));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok();

        Some(
            fmt::Layer::new()
                .json()
                .with_writer(non_blocking)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(crate_filter(&file_log_level, &bin_target)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(RunTimingLayer)
        .try_init()
        .wrap_err("Failed to set global tracing subscriber")?;

    info!(bin = %bin_name, log_to_file, "Logging initialized");
    Ok(())
}

/// Logs the wall-clock duration of spans declared with `on_close = true`.
struct RunTimingLayer;

struct SpanStart(Instant);

struct OnCloseFlag(bool);

impl Visit for OnCloseFlag {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "on_close" {
            self.0 = value;
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
}

impl<S> Layer<S> for RunTimingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut flag = OnCloseFlag(false);
        attrs.record(&mut flag);
        if flag.0 {
            if let Some(span) = ctx.span(id) {
                span.extensions_mut().insert(SpanStart(Instant::now()));
            }
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(&id) {
            let start = span.extensions_mut().remove::<SpanStart>();
            if let Some(SpanStart(start)) = start {
                tracing::debug!(span = span.name(), elapsed = ?start.elapsed(), "span closed");
            }
        }
    }
}
