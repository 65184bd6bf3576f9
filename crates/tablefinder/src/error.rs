//! Error types for tablefinder.
//!
//! This module defines all error types used throughout the tablefinder crate,
//! providing detailed context for debugging and user-friendly error messages.

use thiserror::Error;

/// The main error type for tablefinder operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Upstream Sheet Errors ===
    /// The HTTP request for the published sheet failed (connect, timeout, body read).
    #[error("failed to fetch sheet from {url}: {source}")]
    Fetch {
        /// The sheet URL that was requested.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The sheet host answered with a non-success status.
    #[error("sheet at {url} returned HTTP {status}")]
    UpstreamStatus {
        /// The sheet URL that was requested.
        url: String,
        /// The HTTP status code returned.
        status: u16,
    },

    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    // === Sheet Parsing Errors ===
    /// The CSV document could not be parsed.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the CSV header row.
    #[error("sheet is missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// Failed to bind the listening socket.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address we tried to bind.
        addr: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

}

/// A specialized Result type for tablefinder operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing column error.
    #[must_use]
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error is an upstream request that ran past its deadline.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Fetch { source, .. } if source.is_timeout())
    }

    /// Check if this error came from talking to the sheet host.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::UpstreamStatus { .. })
    }

    /// Check if this error came from a sheet whose content could not be used.
    #[must_use]
    pub fn is_malformed_sheet(&self) -> bool {
        matches!(self, Self::Csv(_) | Self::MissingColumn { .. })
    }
}
