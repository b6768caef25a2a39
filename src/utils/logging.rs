//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the dispatcher.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::state::HandlingResult;
use crate::utils::errors::{BotanixError, ErrorSeverity, Result};

/// Initialize logging based on configuration
///
/// Keep the returned guard alive for as long as the file writer is needed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| BotanixError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "botanix.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| BotanixError::Config(format!("Failed to install subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the outcome of one dispatch
pub fn log_dispatch(user_id: i64, track: &str, step: u32, result: &HandlingResult) {
    if result.is_handled() {
        debug!(
            user_id = user_id,
            track = track,
            step = step,
            disposition = ?result.disposition(),
            "Dispatch handled"
        );
    } else {
        info!(
            user_id = user_id,
            track = track,
            step = step,
            reason = result.unhandled_reason(),
            "Dispatch unhandled"
        );
    }
}

/// Log a routing failure with the full request context
pub fn log_routing_error(user_id: i64, input: &str, track: Option<&str>, step: Option<u32>, err: &BotanixError) {
    match err.severity() {
        ErrorSeverity::Critical | ErrorSeverity::Error => error!(
            user_id = user_id,
            input = input,
            track = track,
            step = step,
            error = %err,
            "Routing failed"
        ),
        _ => warn!(
            user_id = user_id,
            input = input,
            track = track,
            step = step,
            error = %err,
            "Routing failed"
        ),
    }
}
