//! Logging configuration using tracing.
//!
//! The terminal belongs to the dashboard, so events go to a daily rolling
//! file under `<data_local_dir>/bankdash/logs/`. The level is controlled by
//! the `BANKDASH_LOG` environment variable:
//!
//! ```bash
//! BANKDASH_LOG=debug bankdash
//! ```

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{BankDashError, Result};

pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "bankdash.log");

    let env_filter = EnvFilter::try_from_env("BANKDASH_LOG")
        .unwrap_or_else(|_| EnvFilter::new("bankdash=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| BankDashError::Logging(e.to_string()))?;

    tracing::info!("BankDash starting, logs in {}", log_dir.display());
    Ok(())
}

pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bankdash")
        .join("logs")
}
