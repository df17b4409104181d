//! Route pattern errors

use thiserror::Error;

/// Errors raised while parsing a route pattern
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Patterns are absolute
    #[error("Route pattern must start with '/': {0}")]
    MissingLeadingSlash(String),

    /// `//` or a trailing `/` inside the pattern
    #[error("Empty segment at position {position} in route pattern {pattern}")]
    EmptySegment { pattern: String, position: usize },

    /// Capture name is empty or not an identifier
    #[error("Invalid parameter name: {0}")]
    InvalidParamName(String),

    /// The same capture name appears twice
    #[error("Duplicate parameter name: {0}")]
    DuplicateParam(String),
}
