// src/logging.rs

use crate::config::get_config;
use crate::errors::{NoesisError, NoesisResult};
use crate::models::ApiCallLog;
use flexi_logger::{FileSpec, Logger, LoggerHandle};

/// Starts the file logger. The terminal belongs to ratatui, so nothing may
/// ever be printed to stdout/stderr; everything goes to `noesis.log` in the
/// working directory. The returned handle must stay alive for the process
/// lifetime.
pub fn init_logging(log_level: &str) -> NoesisResult<LoggerHandle> {
    let handle = Logger::try_with_str(log_level)
        .map_err(|e| NoesisError::config_error(format!("Invalid log spec: {}", e)))?
        .log_to_file(
            FileSpec::default()
                .basename("noesis")
                .suppress_timestamp(),
        )
        .append()
        .start()
        .map_err(|e| NoesisError::config_error(format!("Failed to start logger: {}", e)))?;

    Ok(handle)
}

/// Logs one API call with endpoint, status and timing, gated by the
/// `request_log` config flag.
pub fn log_api_call(entry: &ApiCallLog) {
    if !get_config().request_log {
        return;
    }

    log::info!(
        target: "api",
        "[{}] {} - {} - Status: {} - Time: {}ms",
        entry.timestamp.to_rfc3339(),
        entry.endpoint,
        entry.request_summary,
        entry.response_status,
        entry.response_time_ms
    );
}
