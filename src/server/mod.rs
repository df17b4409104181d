//! Dev Server
//!
//! HTTP layer of the dev server, built with Axum.
//!
//! Every request passes through these layers, outermost first:
//!
//! 1. CORS (permissive, when enabled)
//! 2. Request tracing
//! 3. The API proxy: any path starting with the proxy prefix is forwarded
//!    upstream and never reaches the handlers below
//! 4. Dev endpoints under `/__dev`
//! 5. Built files from the static root
//! 6. The app shell for paths the route table matches, 404 otherwise
//!
//! # Endpoints
//!
//! - `GET /__dev/health/live` - Liveness probe
//! - `GET /__dev/health` - Full health status
//! - `GET /__dev/resolve?path=/004/0037` - Route resolution as JSON
//!
//! # Example
//!
//! ```rust,ignore
//! use branchfinder::config::Config;
//! use branchfinder::server::{serve, AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default()?;
//!     let state = AppState::from_config(&config)?;
//!     serve(state, &config.server).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::AppState;

use axum::{
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::proxy::proxy_requests;

/// Build the dev server router with all routes and middleware
pub fn build_router(state: AppState, cors: bool) -> Router {
    let forwarder = Arc::clone(&state.forwarder);
    let shared_state = Arc::new(state);

    let shell: MethodRouter = get(routes::shell::app_shell).with_state(Arc::clone(&shared_state));
    let files = ServeDir::new(&shared_state.static_files.root)
        .append_index_html_on_directories(false)
        .fallback(shell);

    let dev_routes = Router::new()
        .route("/health/live", get(routes::health::liveness))
        .route("/health", get(routes::health::full_health))
        .route("/resolve", get(routes::shell::resolve));

    let router = Router::new()
        .nest("/__dev", dev_routes)
        .fallback_service(files)
        .layer(middleware::from_fn_with_state(forwarder, proxy_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Start the dev server
pub async fn serve(state: AppState, config: &ServerConfig) -> ServerResult<()> {
    let rule = state.forwarder.rule();
    tracing::info!(
        "Proxying {}* to {} (change_origin={}, secure={})",
        rule.prefix(),
        rule.target(),
        rule.changes_origin(),
        rule.is_secure()
    );

    let router = build_router(state, config.cors);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Dev server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Dev server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
