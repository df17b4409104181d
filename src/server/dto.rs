//! Data Transfer Objects
//!
//! Request and response types for the dev endpoints.

use serde::{Deserialize, Serialize};

/// Query string of `GET /__dev/resolve`
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Browser path to resolve, defaults to `/`
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_path() -> String {
    "/".to_string()
}

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "ok" when the app shell file exists, "missing" otherwise
    pub shell: String,
    pub proxy: ProxyStatus,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Proxy rule as configured
#[derive(Debug, Serialize)]
pub struct ProxyStatus {
    pub prefix: String,
    pub target: String,
    pub change_origin: bool,
    pub secure: bool,
}
