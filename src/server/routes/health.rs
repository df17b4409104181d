//! Health Routes
//!
//! - GET /__dev/health/live - Liveness probe (process is alive)
//! - GET /__dev/health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::server::dto::{HealthResponse, ProxyStatus};
use crate::server::state::AppState;

/// GET /__dev/health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /__dev/health
///
/// Full status. A missing app shell degrades the server: navigations fail
/// but the proxy keeps working.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let shell_ok = tokio::fs::metadata(state.shell_path())
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);

    let rule = state.forwarder.rule();

    Json(HealthResponse {
        status: if shell_ok { "healthy" } else { "degraded" }.to_string(),
        shell: if shell_ok { "ok" } else { "missing" }.to_string(),
        proxy: ProxyStatus {
            prefix: rule.prefix().to_string(),
            target: rule.target().to_string(),
            change_origin: rule.changes_origin(),
            secure: rule.is_secure(),
        },
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
