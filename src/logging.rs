use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs a file-backed subscriber when a log file is configured.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let Some(path) = &config.file else {
        return Ok(false);
    };

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| eyre!("invalid log level `{}`: {e}", config.level))?;

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;

    Ok(true)
}
