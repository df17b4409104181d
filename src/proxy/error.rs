//! Proxy Error Types
//!
//! Errors raised while forwarding a request. Upstream error *statuses* are
//! not errors here: they are relayed to the caller unchanged. These cover
//! the cases where no upstream response exists to relay.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Proxy error types
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Target origin is not an absolute http(s) URL
    #[error("Invalid proxy target: {0}")]
    InvalidTarget(String),

    /// The rewritten path did not form a valid URL
    #[error("Invalid forward URL {url}: {reason}")]
    InvalidForwardUrl { url: String, reason: String },

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(reqwest::Error),

    /// Could not connect to the target origin
    #[error("Upstream unreachable: {0}")]
    Unreachable(reqwest::Error),

    /// Upstream did not answer within the configured timeout
    #[error("Upstream timed out: {0}")]
    Timeout(reqwest::Error),

    /// Any other failure talking to the upstream
    #[error("Upstream error: {0}")]
    Upstream(reqwest::Error),

    /// Upstream response could not be converted
    #[error("Invalid upstream response: {0}")]
    Response(String),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout(err)
        } else if err.is_connect() {
            ProxyError::Unreachable(err)
        } else {
            ProxyError::Upstream(err)
        }
    }
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidForwardUrl { .. } => StatusCode::BAD_REQUEST,
            ProxyError::Unreachable(_) | ProxyError::Upstream(_) | ProxyError::Response(_) => {
                StatusCode::BAD_GATEWAY
            }
            ProxyError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::InvalidTarget(_) | ProxyError::Client(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::InvalidTarget(_) => "INVALID_TARGET",
            ProxyError::InvalidForwardUrl { .. } => "INVALID_FORWARD_URL",
            ProxyError::Client(_) => "CLIENT_ERROR",
            ProxyError::Unreachable(_) => "UPSTREAM_UNREACHABLE",
            ProxyError::Timeout(_) => "UPSTREAM_TIMEOUT",
            ProxyError::Upstream(_) => "UPSTREAM_ERROR",
            ProxyError::Response(_) => "UPSTREAM_RESPONSE_ERROR",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.code(), &self.to_string())
    }
}
