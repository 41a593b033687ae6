//! Error types and utilities for sheetdash

use thiserror::Error;

/// Result type alias for sheetdash operations
pub type Result<T> = std::result::Result<T, DashError>;

/// Main error type for sheetdash operations
#[derive(Error, Debug)]
pub enum DashError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (HTTP requests, etc.)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The record source returned something that is not a usable table
    #[error("Record source error: {message}")]
    Source {
        message: String,
        status_code: Option<u16>,
    },

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Client directory lookups
    #[error("Client directory error: {message}")]
    Directory { message: String, email: Option<String> },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// A field the caller asked for is not a column of the record set
    #[error("Missing field '{field}' (available columns: {available})")]
    MissingField { field: String, available: String },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DashError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new record source error
    pub fn record_source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
            status_code: None,
        }
    }

    /// Create a new record source error carrying the HTTP status
    pub fn record_source_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Source {
            message: msg.into(),
            status_code: Some(status),
        }
    }

    /// Create a new directory error
    pub fn directory(msg: impl Into<String>) -> Self {
        Self::Directory {
            message: msg.into(),
            email: None,
        }
    }

    /// Report that no client is registered under an e-mail address
    pub fn client_not_found(email: impl Into<String>) -> Self {
        let email = email.into();
        Self::Directory {
            message: format!("Client details not found for {email}"),
            email: Some(email),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a missing-field error listing the columns that do exist
    pub fn missing_field(field: impl Into<String>, available: &[String]) -> Self {
        Self::MissingField {
            field: field.into(),
            available: available.join(", "),
        }
    }

    /// Whether the error is a caller mistake rather than an environmental failure
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::Validation { .. })
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to DashError
impl From<reqwest::Error> for DashError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16()).unwrap_or(0);
            Self::network_with_source(format!("HTTP error: {}", status_code), err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

/// Convert from url::ParseError to DashError
impl From<url::ParseError> for DashError {
    fn from(err: url::ParseError) -> Self {
        Self::Validation {
            message: format!("Invalid URL: {err}"),
            field: Some("url".to_string()),
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to DashError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for DashError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
