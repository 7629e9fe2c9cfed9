//! Logging Infrastructure
//!
//! Structured logging setup shared by every binary embedding this crate.
//! Console output for development, optional daily-rotating file output for
//! production deployments.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console-only logging
///
/// `RUST_LOG` takes precedence over the supplied default level.
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(env_filter))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logger: {e}"))?;

    Ok(())
}

/// Initialize logging with an additional daily-rotating file appender
///
/// # Arguments
/// * `level` - Default log level (e.g. "info", "debug")
/// * `json_format` - JSON output for the file layer (production ingestion)
/// * `log_dir` - Directory for `rms.YYYY-MM-DD` log files
///
/// Returns the appender's worker guard; keep it alive for the lifetime of
/// the process or buffered log lines are dropped on exit.
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: &Path,
) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "rms");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let console_layer = fmt::layer().with_target(true);

    let file_layer = if json_format {
        fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_ansi(false)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logger: {e}"))?;

    tracing::info!(dir = %log_dir.display(), "File logging enabled");
    Ok(guard)
}
