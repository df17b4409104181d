//! Route Table
//!
//! Maps browser paths to the application's view. The table holds a single
//! entry, built once at startup and never mutated.

use serde::Serialize;
use std::fmt;

use super::error::PatternError;
use super::params::BranchParams;
use super::pattern::RoutePattern;

/// Pattern of the branch lookup page
pub const HOME_PATTERN: &str = "/:bankCode?/:branchCode?/:branchName?";

/// Route name of the branch lookup page
pub const HOME_ROUTE: &str = "Home";

/// Identifier of a renderable view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewId(&'static str);

impl ViewId {
    /// The application root component
    pub const APP: ViewId = ViewId("App");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A route: a named pattern bound to a view
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub name: &'static str,
    pub view: ViewId,
    pub pattern: RoutePattern,
}

impl RouteEntry {
    pub fn new(name: &'static str, pattern: &str, view: ViewId) -> Result<Self, PatternError> {
        Ok(Self {
            name,
            view,
            pattern: RoutePattern::parse(pattern)?,
        })
    }
}

/// Outcome of resolving a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Matched(RouteMatch),
    NotFound { path: String },
}

impl Resolution {
    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }
}

/// A successful resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub name: &'static str,
    pub view: ViewId,
    pub path: String,
    pub params: BranchParams,
}

/// The application's route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    entry: RouteEntry,
}

impl RouteTable {
    pub fn new(entry: RouteEntry) -> Self {
        Self { entry }
    }

    /// The branch lookup table: every path of depth 0-3 renders `App`.
    pub fn branch_lookup() -> Result<Self, PatternError> {
        Ok(Self::new(RouteEntry::new(
            HOME_ROUTE,
            HOME_PATTERN,
            ViewId::APP,
        )?))
    }

    pub fn entry(&self) -> &RouteEntry {
        &self.entry
    }

    /// Resolve a browser path to a view and its parameters
    pub fn resolve(&self, path: &str) -> Resolution {
        match self.entry.pattern.matches(path) {
            Some(params) => Resolution::Matched(RouteMatch {
                name: self.entry.name,
                view: self.entry.view,
                path: path.to_string(),
                params: BranchParams::from(&params),
            }),
            None => Resolution::NotFound {
                path: path.to_string(),
            },
        }
    }
}
