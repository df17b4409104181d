//! # branchfinder
//!
//! Dev server for the bank branch lookup application.
//!
//! The application itself is a single page with one route,
//! `/:bankCode?/:branchCode?/:branchName?`. During development its API
//! calls go to `/api/...` on the dev server, which strips the prefix and
//! forwards them to the remote banking origin named by `VITE_API_URL`.
//!
//! ## Modules
//!
//! - [`router`]: Route table and path resolution
//! - [`proxy`]: Proxy rule and request forwarding
//! - [`server`]: Axum dev server tying both together
//! - [`config`]: TOML configuration with environment overrides
//! - [`envfile`]: `.env` file loading
//!
//! ## Quick Start
//!
//! ```rust
//! use branchfinder::proxy::ProxyRule;
//! use branchfinder::router::{Resolution, RouteTable};
//!
//! let routes = RouteTable::branch_lookup().unwrap();
//! if let Resolution::Matched(m) = routes.resolve("/004/0037") {
//!     assert_eq!(m.params.bank_code.as_deref(), Some("004"));
//!     assert_eq!(m.params.branch_name, None);
//! }
//!
//! let rule = ProxyRule::new("/api", "https://bank.5xcamp.us").unwrap();
//! let url = rule.forward_url("/api/branches/001", None).unwrap();
//! assert_eq!(url.as_str(), "https://bank.5xcamp.us/branches/001");
//! ```

pub mod config;
pub mod envfile;
pub mod proxy;
pub mod router;
pub mod server;

pub use config::{Config, ConfigError, LogFormat, LoggingConfig, ProxyConfig, ServerConfig};

pub use envfile::{EnvFiles, EnvMap};

pub use proxy::{Forwarder, ProxyError, ProxyRule};

pub use router::{BranchParams, PatternError, Resolution, RouteMatch, RouteTable, ViewId};

pub use server::{build_router, serve, AppState, ServerError};
