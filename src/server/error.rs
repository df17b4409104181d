//! Server Error Types
//!
//! Error types for the dev server and the JSON error body shared by every
//! error response it produces.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::proxy::ProxyError;
use crate::router::PatternError;

/// Dev server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// Startup configuration is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Route table could not be built
    #[error("Route error: {0}")]
    Route(#[from] PatternError),

    /// Proxy setup or forwarding failed
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    /// No route matched the path
    #[error("No route matches {0}")]
    NotFound(String),

    /// The app shell file could not be read
    #[error("App shell unavailable at {path:?}: {error}")]
    ShellUnavailable { path: PathBuf, error: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Build a JSON error response and log it
pub fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();

    if status.is_server_error() {
        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %message,
            "Request failed"
        );
    } else {
        tracing::debug!(
            request_id = %request_id,
            error_code = %code,
            error_message = %message,
            "Request rejected"
        );
    }

    let body = ErrorResponse {
        error: ErrorBody {
            code: code.to_string(),
            message: message.to_string(),
        },
        request_id,
    };

    (status, Json(body)).into_response()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            ServerError::Proxy(e) => return e.into_response(),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ServerError::ShellUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "SHELL_UNAVAILABLE")
            }
            ServerError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            ServerError::Route(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ROUTE_ERROR"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ServerError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        error_response(status, code, &self.to_string())
    }
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;
