//! Logging initialization.
//!
//! The console takes over the terminal, so logs go to a daily-rotated file
//! under `${COPYDESK_HOME}/logs`. The filter is controlled by the
//! `COPYDESK_LOG` environment variable.

use anyhow::{Context, Result};
use copydesk_core::config::paths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "copydesk=info,copydesk_core=info,copydesk_tui=info";

/// Initializes file logging. The returned guard must be kept alive for the
/// lifetime of the process so buffered log lines are flushed.
pub fn init() -> Result<WorkerGuard> {
    let logs_dir = paths::logs_dir();
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "copydesk.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env("COPYDESK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
