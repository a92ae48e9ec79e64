//! Logging setup for the sheetscrub binary.
//!
//! Logs go to stderr and to a daily rotating file in the platform data
//! directory. The library itself only emits `tracing` events.
//!
//! ```no_run
//! use sheetscrub::logging;
//!
//! logging::init(false).expect("Failed to initialize logging");
//! tracing::info!("Cleaning started");
//! ```

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/sheetscrub/logs`
/// - macOS: `~/Library/Application Support/sheetscrub/logs`
/// - Linux: `~/.local/share/sheetscrub/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join("sheetscrub").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Installs the global subscriber.
///
/// The default level is `info` (`debug` when `verbose`), overridable with
/// `RUST_LOG`.
///
/// # Errors
///
/// Returns error if the log directory or the file appender cannot be created.
pub fn init(verbose: bool) -> Result<()> {
    let log_dir = get_log_dir()?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix("sheetscrub")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create log file appender")?;

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    let file_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("A global subscriber is already installed")?;

    tracing::debug!("Logging initialized, log directory: {}", log_dir.display());

    Ok(())
}
