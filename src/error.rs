//! Error types and handling for alfen-bridge
//!
//! This module defines the error taxonomy of the charger client. Every
//! network or parse failure is wrapped with context and propagated; the only
//! failure that is deliberately swallowed is a failed network logout.

use thiserror::Error;

/// Result type alias for charger client operations
pub type Result<T> = std::result::Result<T, AlfenError>;

/// Main error type for alfen-bridge
#[derive(Debug, Error)]
pub enum AlfenError {
    /// Login rejected or transport failure during login.
    /// The session is always torn down when this is returned.
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// Non-200 status or transport failure on an authenticated call
    #[error("Request error{}: {message}", status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Request {
        status: Option<u16>,
        message: String,
    },

    /// Setter validation failure or failed property write
    #[error("Property write error: {property} - {message}")]
    PropertyWrite { property: String, message: String },

    /// Response body was not valid JSON where JSON was expected
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// An API call was made without an active session
    #[error("Not logged in: no active charger session")]
    NotLoggedIn,

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Timeout errors
    #[error("Timeout error: {message}")]
    Timeout { message: String },
}

impl AlfenError {
    /// Create a new authentication error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        AlfenError::Authentication {
            message: message.into(),
        }
    }

    /// Create a request error carrying the HTTP status code
    pub fn status<S: Into<String>>(status: u16, message: S) -> Self {
        AlfenError::Request {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a request error for a transport-level failure
    pub fn request<S: Into<String>>(message: S) -> Self {
        AlfenError::Request {
            status: None,
            message: message.into(),
        }
    }

    /// Create a new property write error
    pub fn property_write<S: Into<String>>(property: S, message: S) -> Self {
        AlfenError::PropertyWrite {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        AlfenError::Parse {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        AlfenError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        AlfenError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        AlfenError::Io {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        AlfenError::Timeout {
            message: message.into(),
        }
    }

    /// HTTP status code, if this error came from a non-200 response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AlfenError::Request { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<std::io::Error> for AlfenError {
    fn from(err: std::io::Error) -> Self {
        AlfenError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for AlfenError {
    fn from(err: serde_yaml::Error) -> Self {
        AlfenError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AlfenError {
    fn from(err: serde_json::Error) -> Self {
        AlfenError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AlfenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AlfenError::timeout(err.to_string());
        }
        match err.status() {
            Some(status) => AlfenError::status(status.as_u16(), err.to_string()),
            None => AlfenError::request(err.to_string()),
        }
    }
}
