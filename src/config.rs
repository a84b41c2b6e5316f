//! Configuration management for alfen-bridge
//!
//! This module handles loading, validation, and management of the bridge
//! configuration from YAML files.

use crate::error::{AlfenError, Result};
use crate::props::SocketIndex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

mod defaults;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Charger connection and credentials
    pub charger: ChargerConfig,

    /// HTTP transport tuning
    pub http: HttpConfig,

    /// Polling interval in seconds
    pub poll_interval_secs: u64,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Charger connection parameters
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargerConfig {
    /// Host name or IP address of the charger
    pub host: String,

    /// API user name (usually `admin`)
    pub username: String,

    /// API password
    pub password: String,

    /// URL scheme; the charger only speaks https
    pub scheme: String,

    /// Socket polled by this instance (1 or 2)
    pub socket: u8,
}

/// HTTP transport parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// How long an idle keep-alive connection is kept in the pool
    pub pool_idle_timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file or log directory
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Credentials handed to the client at construction time
#[derive(Clone, PartialEq, Eq)]
pub struct ChargerCredentials {
    pub host: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for ChargerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChargerCredentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for ChargerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChargerConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("scheme", &self.scheme)
            .field("socket", &self.socket)
            .finish()
    }
}

impl ChargerConfig {
    /// Credentials for the API client
    pub fn credentials(&self) -> ChargerCredentials {
        ChargerCredentials {
            host: self.host.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    /// Base URL of the charger, e.g. `https://192.168.1.50`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// Configured socket as a typed index
    pub fn socket_index(&self) -> Result<SocketIndex> {
        SocketIndex::try_from(self.socket)
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.pool_idle_timeout_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = [
            "alfen_bridge.yaml",
            "/data/alfen_bridge.yaml",
            "/etc/alfen-bridge/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.charger.host.trim().is_empty() {
            return Err(AlfenError::validation(
                "charger.host",
                "Host cannot be empty",
            ));
        }

        if self.charger.username.trim().is_empty() {
            return Err(AlfenError::validation(
                "charger.username",
                "Username cannot be empty",
            ));
        }

        if !matches!(self.charger.scheme.as_str(), "http" | "https") {
            return Err(AlfenError::validation(
                "charger.scheme",
                "Must be http or https",
            ));
        }

        if self.charger.socket_index().is_err() {
            return Err(AlfenError::validation("charger.socket", "Must be 1 or 2"));
        }

        if self.poll_interval_secs == 0 {
            return Err(AlfenError::validation(
                "poll_interval_secs",
                "Must be greater than 0",
            ));
        }

        if self.http.request_timeout_ms == 0 {
            return Err(AlfenError::validation(
                "http.request_timeout_ms",
                "Must be greater than 0",
            ));
        }

        if self.http.pool_idle_timeout_ms == 0 {
            return Err(AlfenError::validation(
                "http.pool_idle_timeout_ms",
                "Must be greater than 0",
            ));
        }

        crate::logging::parse_log_level(&self.logging.level)?;

        Ok(())
    }
}
