//! Dev Proxy
//!
//! Forwards API traffic from the local dev server to the remote banking
//! origin so the browser never makes a cross-origin call.
//!
//! - [`rule`]: prefix matching, path rewriting and target URLs
//! - [`forward`]: the HTTP client and the router middleware

pub mod error;
pub mod forward;
pub mod rule;

pub use error::ProxyError;
pub use forward::{proxy_requests, Forwarder};
pub use rule::{ProxyRule, DEFAULT_PREFIX};
