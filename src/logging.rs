//! File logging
//!
//! The terminal belongs to the UI, so every trace goes to a daily file under
//! `.logs/`. `RUST_LOG` overrides the default filter.

use std::fs;

use anyhow::Context;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "spotty";
const DEFAULT_FILTER: &str = "spotty=debug,rspotify=info,warn";

/// Installs the global subscriber writing to `.logs/spotty.YYYY-MM-DD`.
///
/// Keep the returned guard alive until exit; dropping it flushes and stops the
/// background writer.
pub fn init_logging() -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(LOG_DIR).with_context(|| format!("creating {}", LOG_DIR))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);

    tracing_subscriber::registry().with(filter).with(layer).try_init()?;
    tracing::info!(dir = LOG_DIR, "Logging initialized");
    Ok(guard)
}

/// Logs the outcome of a Spotify call: `info!` on success, `error!` with the error otherwise.
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(operation = $operation, "Spotify call succeeded"),
            Err(e) => tracing::error!(operation = $operation, error = %e, "Spotify call failed"),
        }
    };
}

/// Logs a Spotify call about to go out, with optional extra fields.
#[macro_export]
macro_rules! log_api_request {
    ($operation:expr) => {
        tracing::debug!(operation = $operation, "Spotify call")
    };
    ($operation:expr, $($field:tt)+) => {
        tracing::debug!(operation = $operation, $($field)+, "Spotify call")
    };
}
