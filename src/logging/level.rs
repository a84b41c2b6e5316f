use crate::error::{AlfenError, Result};
use tracing::Level;

/// Parse a log level string into a tracing `Level`
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.trim().to_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARN" | "WARNING" => Ok(Level::WARN),
        "ERROR" => Ok(Level::ERROR),
        _ => Err(AlfenError::config(format!(
            "Invalid log level: {}",
            level_str
        ))),
    }
}
