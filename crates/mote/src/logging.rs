//! File logging. The terminal belongs to the clock, so records go to
//! `mote.log` in the platform data directory.

use std::fs;

use mote_config::ClockConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "mote.log";

/// Install the global subscriber. Filtering follows `RUST_LOG`, falling
/// back to `info`.
///
/// Returns `None` when no log directory is available; the clock then runs
/// without logging. Keep the guard alive until exit so buffered records
/// are flushed.
pub fn init() -> Option<WorkerGuard> {
    let dirs = ClockConfig::project_dirs()?;
    let dir = dirs.data_local_dir();
    if let Err(err) = fs::create_dir_all(dir) {
        eprintln!("mote: cannot create log directory {}: {err}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .ok()?;

    tracing::info!(path = %dir.join(LOG_FILE).display(), "logging initialized");
    Some(guard)
}
