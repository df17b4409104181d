//! Route Patterns
//!
//! Parses URL templates such as `/:bankCode?/:branchCode?/:branchName?`
//! and matches browser paths against them.
//!
//! A pattern is a sequence of segments. Each segment is either a literal
//! (`/banks`) or a named capture (`/:bankCode`), and a capture may be marked
//! optional with a trailing `?`. Matching follows history-mode routing:
//! only the path takes part, query strings and fragments are ignored,
//! literals compare case-insensitively and a trailing slash is accepted.
//! A capture never binds an empty segment, so `//Taipei` matches nothing.

use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use super::error::PatternError;

/// One segment of a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must appear verbatim
    Literal(String),
    /// Binds the URL segment at this position to `name`
    Param { name: String, optional: bool },
}

/// A parsed route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern string.
    ///
    /// The pattern must start with `/`. `/` alone is the empty pattern that
    /// only matches the root path.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let body = source
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(source.to_string()))?;

        let mut segments = Vec::new();
        let mut seen = HashSet::new();

        if !body.is_empty() {
            for (position, raw) in body.split('/').enumerate() {
                if raw.is_empty() {
                    return Err(PatternError::EmptySegment {
                        pattern: source.to_string(),
                        position,
                    });
                }

                let segment = match raw.strip_prefix(':') {
                    Some(capture) => {
                        let (name, optional) = match capture.strip_suffix('?') {
                            Some(name) => (name, true),
                            None => (capture, false),
                        };

                        if !is_valid_param_name(name) {
                            return Err(PatternError::InvalidParamName(raw.to_string()));
                        }
                        if !seen.insert(name.to_string()) {
                            return Err(PatternError::DuplicateParam(name.to_string()));
                        }

                        Segment::Param {
                            name: name.to_string(),
                            optional,
                        }
                    }
                    None => Segment::Literal(raw.to_string()),
                };

                segments.push(segment);
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of all captures, in positional order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a path against this pattern.
    ///
    /// Returns the bound parameters, with absent optional captures bound to
    /// `None`, or `None` when the path does not fit the pattern.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let actual = split_path(path)?;

        if actual.len() > self.segments.len() {
            return None;
        }

        let mut params = RouteParams::default();

        for (index, segment) in self.segments.iter().enumerate() {
            let value = actual.get(index).copied();

            match (segment, value) {
                (Segment::Literal(expected), Some(value)) => {
                    if !expected.eq_ignore_ascii_case(value) {
                        return None;
                    }
                }
                (Segment::Literal(_), None) => return None,
                (Segment::Param { name, .. }, Some(value)) => {
                    params.bind(name, Some(decode_segment(value)));
                }
                (Segment::Param { name, optional }, None) => {
                    if !optional {
                        return None;
                    }
                    params.bind(name, None);
                }
            }
        }

        Some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parameters bound by a successful match, in positional order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteParams {
    bound: Vec<(String, Option<String>)>,
}

impl RouteParams {
    fn bind(&mut self, name: &str, value: Option<String>) {
        self.bound.push((name.to_string(), value));
    }

    /// Value bound to `name`, if the capture was present in the URL
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bound
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Whether the pattern declares a capture called `name`
    pub fn declares(&self, name: &str) -> bool {
        self.bound.iter().any(|(n, _)| n == name)
    }

    /// Number of captures that were present in the URL
    pub fn present_count(&self) -> usize {
        self.bound.iter().filter(|(_, v)| v.is_some()).count()
    }
}

/// Split the path part of a URL into its segments.
///
/// `None` when an empty segment sits anywhere but after a single trailing
/// slash.
fn split_path(path: &str) -> Option<Vec<&str>> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let path = path.strip_prefix('/').unwrap_or(path);
    if path.is_empty() {
        return Some(Vec::new());
    }

    let path = path.strip_suffix('/').unwrap_or(path);
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments)
}

/// Percent-decode a segment; segments that do not decode to UTF-8 are kept raw.
fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

fn is_valid_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRANCH: &str = "/:bankCode?/:branchCode?/:branchName?";

    #[test]
    fn test_parse_optional_params() {
        let pattern = RoutePattern::parse(BRANCH).unwrap();
        assert_eq!(pattern.segments().len(), 3);
        assert_eq!(
            pattern.segments()[0],
            Segment::Param {
                name: "bankCode".to_string(),
                optional: true
            }
        );
        let names: Vec<&str> = pattern.param_names().collect();
        assert_eq!(names, vec!["bankCode", "branchCode", "branchName"]);
    }

    #[test]
    fn test_parse_mixed_segments() {
        let pattern = RoutePattern::parse("/banks/:bankCode").unwrap();
        assert_eq!(pattern.segments()[0], Segment::Literal("banks".to_string()));
        assert_eq!(
            pattern.segments()[1],
            Segment::Param {
                name: "bankCode".to_string(),
                optional: false
            }
        );
    }

    #[test]
    fn test_parse_root() {
        let pattern = RoutePattern::parse("/").unwrap();
        assert!(pattern.segments().is_empty());
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/004").is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            RoutePattern::parse(":bankCode"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            RoutePattern::parse("/a//b"),
            Err(PatternError::EmptySegment { position: 1, .. })
        ));
        assert!(matches!(
            RoutePattern::parse("/:?"),
            Err(PatternError::InvalidParamName(_))
        ));
        assert!(matches!(
            RoutePattern::parse("/:1st"),
            Err(PatternError::InvalidParamName(_))
        ));
        assert!(matches!(
            RoutePattern::parse("/:code/:code?"),
            Err(PatternError::DuplicateParam(_))
        ));
    }

    #[test]
    fn test_match_binds_present_segments() {
        let pattern = RoutePattern::parse(BRANCH).unwrap();
        let params = pattern.matches("/004/0012").unwrap();

        assert_eq!(params.get("bankCode"), Some("004"));
        assert_eq!(params.get("branchCode"), Some("0012"));
        assert_eq!(params.get("branchName"), None);
        assert!(params.declares("branchName"));
        assert_eq!(params.present_count(), 2);
    }

    #[test]
    fn test_match_root_binds_nothing() {
        let pattern = RoutePattern::parse(BRANCH).unwrap();
        let params = pattern.matches("/").unwrap();
        assert_eq!(params.present_count(), 0);

        let params = pattern.matches("").unwrap();
        assert_eq!(params.present_count(), 0);
    }

    #[test]
    fn test_match_too_deep() {
        let pattern = RoutePattern::parse(BRANCH).unwrap();
        assert!(pattern.matches("/a/b/c/d").is_none());
    }

    #[test]
    fn test_match_ignores_query_and_fragment() {
        let pattern = RoutePattern::parse(BRANCH).unwrap();
        let params = pattern.matches("/004?tab=map#top").unwrap();
        assert_eq!(params.get("bankCode"), Some("004"));
        assert_eq!(params.get("branchCode"), None);
    }

    #[test]
    fn test_match_trailing_slash() {
        let pattern = RoutePattern::parse(BRANCH).unwrap();
        let params = pattern.matches("/004/0012/").unwrap();
        assert_eq!(params.get("branchCode"), Some("0012"));
    }

    #[test]
    fn test_match_rejects_empty_segments() {
        let pattern = RoutePattern::parse(BRANCH).unwrap();
        assert!(pattern.matches("//Taipei").is_none());
        assert!(pattern.matches("/004//Taipei").is_none());
        assert!(pattern.matches("/004/0012//").is_none());
        assert!(pattern.matches("//").is_none());
    }

    #[test]
    fn test_match_decodes_segments() {
        let pattern = RoutePattern::parse(BRANCH).unwrap();
        let params = pattern
            .matches("/004/0012/%E5%8F%B0%E5%8C%97%E5%88%86%E8%A1%8C")
            .unwrap();
        assert_eq!(params.get("branchName"), Some("台北分行"));
    }

    #[test]
    fn test_match_literals() {
        let pattern = RoutePattern::parse("/banks/:bankCode?").unwrap();
        assert!(pattern.matches("/banks").is_some());
        assert!(pattern.matches("/BANKS/004").is_some());
        assert!(pattern.matches("/branches/004").is_none());
        assert!(pattern.matches("/").is_none());
    }

    #[test]
    fn test_match_required_param_missing() {
        let pattern = RoutePattern::parse("/:bankCode").unwrap();
        assert!(pattern.matches("/").is_none());
        assert!(pattern.matches("/004").is_some());
    }
}
