//! Application State
//!
//! Shared state accessible by all handlers. Everything in it is built once
//! at startup and only read afterwards.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, StaticFilesConfig};
use crate::proxy::Forwarder;
use crate::router::RouteTable;

use super::error::ServerResult;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Route table resolving browser paths
    pub routes: Arc<RouteTable>,
    /// Proxy forwarder for the API prefix
    pub forwarder: Arc<Forwarder>,
    /// Built application files
    pub static_files: Arc<StaticFilesConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(routes: RouteTable, forwarder: Forwarder, static_files: StaticFilesConfig) -> Self {
        Self {
            routes: Arc::new(routes),
            forwarder: Arc::new(forwarder),
            static_files: Arc::new(static_files),
            start_time: Instant::now(),
        }
    }

    /// Build state from configuration.
    ///
    /// Fails when the proxy target is missing or invalid.
    pub fn from_config(config: &Config) -> ServerResult<Self> {
        let routes = RouteTable::branch_lookup()?;
        let rule = config.proxy_rule()?;
        let forwarder = Forwarder::new(rule, config.proxy.timeout())?;

        Ok(Self::new(routes, forwarder, config.static_files.clone()))
    }

    /// Path of the app shell
    pub fn shell_path(&self) -> PathBuf {
        self.static_files.shell_path()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
