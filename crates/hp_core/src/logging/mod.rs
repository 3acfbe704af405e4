//! Logging setup: console output plus a size-rotated log file whose lines
//! read `<timestamp> <LEVEL>: <message>`.

use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::Result;

mod format;
mod rotating;

pub use format::{LineFormat, TIMESTAMP_FORMAT};
pub use rotating::{RotatingFileHandle, RotatingFileWriter};

pub const DEFAULT_LOG_FILE: &str = "app.log";
pub const DEFAULT_MAX_BYTES: u64 = 1_000_000;
pub const DEFAULT_BACKUPS: usize = 3;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub file: PathBuf,
    pub max_bytes: u64,
    pub backups: usize,
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            max_bytes: DEFAULT_MAX_BYTES,
            backups: DEFAULT_BACKUPS,
            level: "info".to_string(),
        }
    }
}

/// Install the global subscriber. Fails if the log file cannot be opened
/// or a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let file_writer = RotatingFileWriter::new(&config.file, config.max_bytes, config.backups)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(
            fmt::layer()
                .event_format(LineFormat)
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    Ok(())
}
