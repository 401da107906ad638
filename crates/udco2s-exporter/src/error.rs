//! Error types for udco2s-exporter

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Exporter-level errors. Anything surfacing as this type ends the process.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The serial device could not be opened
    #[error("Failed to open serial device {path}: {source}")]
    SerialOpen {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// The start command could not be written to the sensor
    #[error("Failed to send start command: {0}")]
    StartCommand(#[source] std::io::Error),

    /// Metrics registration or encoding error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// HTTP server error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ExporterError {
    fn from(err: config::ConfigError) -> Self {
        ExporterError::Config(err.to_string())
    }
}

/// Why a single sensor line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line does not have the `CO2=..,HUM=..,TMP=..` layout
    #[error("unexpected sensor response: {0:?}")]
    NoMatch(String),

    /// The layout matched but a number could not be converted
    #[error("invalid {field} value: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ExporterError> for ApiError {
    fn from(err: ExporterError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for exporter operations
pub type ExporterResult<T> = Result<T, ExporterError>;
