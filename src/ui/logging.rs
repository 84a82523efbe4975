//! Logging utilities
//!
//! The terminal belongs to the UI, so log records go to a size-rotated file
//! in the user's cache directory instead.

use std::fs::{self, remove_file};
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use env_logger::{Builder, Target, fmt::TimestampPrecision};
use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use log::LevelFilter;

/// Size at which the log file is rotated.
const MAX_LOG_BYTES: usize = 1024 * 1024;

/// Number of rotated files kept next to the live one.
const KEPT_LOG_FILES: usize = 3;

/// Returns the path of the log file.
///
/// # Errors
///
/// Returns an error if the user's cache directory cannot be determined.
pub fn log_file_path() -> Result<PathBuf>
{
    let dirs = ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
        .context("Failed to determine project directories")?;
    Ok(dirs.cache_dir().join(concat!(env!("CARGO_PKG_NAME"), ".log")))
}

/// Initializes the logging system for the application.
///
/// Everything at `Info` and above is logged, this crate from `Debug`.
/// `RUST_LOG` overrides both.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the logger
/// was already installed.
pub fn init_logging() -> Result<PathBuf>
{
    let log_path = log_file_path()?;
    if let Some(dir) = log_path.parent()
    {
        fs::create_dir_all(dir).context("Failed to create log directory")?;
    }

    let writer = FileRotate::new(
        &log_path,
        AppendCount::new(KEPT_LOG_FILES),
        ContentLimit::Bytes(MAX_LOG_BYTES),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Debug)
        .parse_default_env()
        .format_timestamp(Some(TimestampPrecision::Millis))
        .target(Target::Pipe(Box::new(writer)))
        .try_init()
        .context("Failed to install logger")?;

    Ok(log_path)
}

/// Removes the log file.
///
/// # Errors
///
/// Returns an error if the path cannot be determined or the file exists
/// but cannot be removed.
pub fn clear_log_file() -> Result<()>
{
    let log_path = log_file_path()?;
    if log_path.exists()
    {
        remove_file(&log_path)
            .with_context(|| format!("Failed to remove {}", log_path.display()))?;
    }
    Ok(())
}
