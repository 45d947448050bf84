// src/error.rs

//! Unified error handling for the lead monitor.

use std::fmt;

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Missing or rejected access token
    #[error("Credential error: {0}")]
    Credential(String),

    /// Feed gateway returned a non-success status; status is passed through verbatim
    #[error("Gateway error (status {status}): {message}")]
    Gateway { status: u16, message: String },

    /// Per-group ingestion failure; logged and skipped, never aborts the run
    #[error("Ingest error for group {group}: {message}")]
    Ingest { group: String, message: String },

    /// Malformed operator-supplied file (group list, keyword list, token)
    #[error("Import error in {file}: {message}")]
    Import { file: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a credential error.
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential(message.into())
    }

    /// Create a gateway error carrying the upstream status code.
    pub fn gateway(status: u16, message: impl fmt::Display) -> Self {
        Self::Gateway {
            status,
            message: message.to_string(),
        }
    }

    /// Create a per-group ingest error.
    pub fn ingest(group: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Ingest {
            group: group.into(),
            message: message.to_string(),
        }
    }

    /// Create an import error for an operator file.
    pub fn import(file: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Import {
            file: file.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
