//! Error types for LabSite
//!
//! Provides the error taxonomy shared by the content layer and the site:
//! - Distinct error types for backend, transport and envelope failures
//! - HTTP status code mapping
//! - Structured error responses
//! - Error codes for client handling
//!
//! "Not found" for slug lookups is not an error: accessors return `Ok(None)`.
//! `NotFound` exists for routes whose essential data is missing.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Resource errors (4xxx)
    NotFound,

    // Content backend errors (8xxx)
    BackendError,
    NetworkError,
    MalformedResponse,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 4001,

            ErrorCode::BackendError => 8001,
            ErrorCode::NetworkError => 8002,
            ErrorCode::MalformedResponse => 8003,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found: {resource_type} with slug {slug}")]
    NotFound { resource_type: String, slug: String },

    // Content backend errors
    #[error("Backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Malformed backend response: {message}")]
    MalformedResponse { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a malformed envelope
    pub fn malformed(message: impl Into<String>) -> Self {
        AppError::MalformedResponse { message: message.into() }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::Backend { .. } => ErrorCode::BackendError,
            AppError::Network { .. } => ErrorCode::NetworkError,
            AppError::MalformedResponse { .. } => ErrorCode::MalformedResponse,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 404 Not Found
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,

            // 502 Bad Gateway
            AppError::Backend { .. } |
            AppError::Network { .. } |
            AppError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            AppError::Internal { .. } |
            AppError::Configuration { .. } |
            AppError::Serialization(_) |
            AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when the content backend could not deliver usable data
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            AppError::Backend { .. } | AppError::Network { .. } | AppError::MalformedResponse { .. }
        )
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}
