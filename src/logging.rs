//! Console and rolling-file logging.

use std::path::Path;

use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;
use crate::error::AppError;

const LOG_FILE_PREFIX: &str = "wod-bot";
const LOG_FILES_KEPT: usize = 7;
const DEFAULT_FILTER: &str = "wod_bot=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Records from the `log` macros are bridged into the same subscriber.
pub fn setup_logging(config: &Config) -> Result<(), AppError> {
    let file_writer = daily_file_writer(&config.logs_path)?;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stdout).with_ansi(true))
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_thread_ids(true),
        )
        .try_init()
        .map_err(|e| AppError::ConfigurationError {
            msg: format!("Failed to install logger: {e}"),
        })
}

/// One file per day under `dir`, keeping the last week.
fn daily_file_writer(dir: &Path) -> Result<NonBlocking, AppError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(LOG_FILES_KEPT)
        .build(dir)
        .map_err(|e| AppError::ConfigurationError {
            msg: format!("Cannot write logs to '{}': {e}", dir.display()),
        })?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    // The writer thread must outlive main.
    std::mem::forget(guard);
    Ok(writer)
}
