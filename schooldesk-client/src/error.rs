//! Client error types
//!
//! One enum per concern, all built on thiserror so callers can match on the
//! failure and the CLI can wrap them with anyhow context.

use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, timeout, TLS)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered 401; the session has been invalidated
    #[error("Unauthorized - please login again")]
    Unauthorized,

    /// No session is active for a request that needs one
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Any other non-success status
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Body could not be decoded
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL or path could not form a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Core(#[from] schooldesk_core::CoreError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Session persistence failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unable to determine data directory")]
    NoDataDir,

    #[error("Session storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid session: {0}")]
    Invalid(#[from] schooldesk_model::ModelError),
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
