//! Logging configuration using the tracing ecosystem.
//!
//! Two layers are installed:
//! - A compact stderr layer for user-facing warnings and errors
//! - A daily rotating log file with full detail

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Environment variable controlling the stderr log filter.
pub const LOG_ENV: &str = "ESCRIPTS_LOG";

/// Default stderr filter if neither `ESCRIPTS_LOG` nor `RUST_LOG` is set.
const DEFAULT_LOG_FILTER: &str = "escripts=info,warn";

/// Filter for the log file.
const FILE_LOG_FILTER: &str = "escripts=debug,warn";

/// Initialize the logging system.
///
/// The stderr filter comes from `ESCRIPTS_LOG`, then `RUST_LOG`, then the
/// built-in default. If the log file cannot be opened, logging falls back to
/// stderr only and a warning is printed.
///
/// # Log Directory
///
/// - Linux: `~/.local/share/escripts/logs/`
/// - macOS: `~/Library/Application Support/escripts/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\escripts\logs\`
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be set.
pub fn init() -> anyhow::Result<()> {
    let stderr_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .with_filter(stderr_filter);

    let file_layer = match prepare_log_directory().and_then(|dir| file_appender(&dir)) {
        Ok(appender) => Some(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(EnvFilter::new(FILE_LOG_FILTER)),
        ),
        Err(e) => {
            eprintln!("warning: file logging disabled: {e}");
            None
        }
    };

    let subscriber = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "escripts starting up");

    Ok(())
}

fn prepare_log_directory() -> anyhow::Result<PathBuf> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}

/// Open the daily rotating log file in `log_dir`.
fn file_appender(log_dir: &Path) -> anyhow::Result<RollingFileAppender> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("escripts.log")
        .build(log_dir)?;
    Ok(appender)
}

/// Get the log directory path.
///
/// Returns the platform-specific local data directory with `escripts/logs` appended.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("escripts").join("logs"))
}

/// Log the end of the run.
pub fn shutdown(exit_code: i32) {
    tracing::debug!(exit_code, "escripts finished");
}
