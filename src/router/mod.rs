//! Route Table
//!
//! History-mode routing for the branch lookup application.
//!
//! - [`pattern`]: URL template parsing and matching
//! - [`params`]: typed parameters for the home view
//! - [`table`]: the route table and path resolution

pub mod error;
pub mod params;
pub mod pattern;
pub mod table;

pub use error::PatternError;
pub use params::BranchParams;
pub use pattern::{RouteParams, RoutePattern, Segment};
pub use table::{Resolution, RouteEntry, RouteMatch, RouteTable, ViewId, HOME_PATTERN, HOME_ROUTE};
