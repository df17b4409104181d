//! App Shell Routes
//!
//! Navigations that are neither proxied nor a built file land here. The
//! path is resolved against the route table: a match serves the app shell
//! (`index.html`) and names the route and view in response headers, a miss
//! is a plain 404.
//!
//! - GET /__dev/resolve?path=... - Resolution of a path as JSON

use axum::{
    extract::{Query, State},
    http::Uri,
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::router::Resolution;
use crate::server::dto::ResolveQuery;
use crate::server::error::{ServerError, ServerResult};
use crate::server::state::AppState;

/// Header naming the matched route
pub const ROUTE_NAME_HEADER: &str = "x-route-name";

/// Header naming the view rendered for the route
pub const ROUTE_VIEW_HEADER: &str = "x-route-view";

/// GET fallback for every unproxied, non-file path
pub async fn app_shell(State(state): State<Arc<AppState>>, uri: Uri) -> ServerResult<Response> {
    let matched = match state.routes.resolve(uri.path()) {
        Resolution::Matched(matched) => matched,
        Resolution::NotFound { path } => return Err(ServerError::NotFound(path)),
    };

    let shell_path = state.shell_path();
    let html = tokio::fs::read_to_string(&shell_path)
        .await
        .map_err(|e| ServerError::ShellUnavailable {
            path: shell_path.clone(),
            error: e.to_string(),
        })?;

    tracing::debug!(
        path = %matched.path,
        route = matched.name,
        view = %matched.view,
        "Serving app shell"
    );

    Ok((
        [
            (ROUTE_NAME_HEADER, matched.name),
            (ROUTE_VIEW_HEADER, matched.view.as_str()),
        ],
        Html(html),
    )
        .into_response())
}

/// GET /__dev/resolve
///
/// Resolve a path without serving anything.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> Json<Resolution> {
    Json(state.routes.resolve(&query.path))
}
