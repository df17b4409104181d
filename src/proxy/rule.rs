//! Proxy Rule
//!
//! Decides which request paths are forwarded and where they go.
//!
//! A rule has a literal path prefix and a target origin. Matching is a plain
//! string prefix test, so `/api`, `/api/banks` and `/apiary` all match the
//! `/api` rule. The prefix is stripped once before the path is appended to
//! the target.

use reqwest::Url;

use super::error::ProxyError;

/// Prefix routed to the remote banking API
pub const DEFAULT_PREFIX: &str = "/api";

/// A reverse-proxy rule for one path prefix
#[derive(Debug, Clone)]
pub struct ProxyRule {
    prefix: String,
    target: Url,
    change_origin: bool,
    secure: bool,
}

impl ProxyRule {
    /// Create a rule forwarding `prefix` to `target`.
    ///
    /// Defaults: the Host header is rewritten to the target and upstream
    /// TLS certificates are not validated.
    pub fn new(prefix: impl Into<String>, target: &str) -> Result<Self, ProxyError> {
        Ok(Self {
            prefix: prefix.into(),
            target: parse_target(target)?,
            change_origin: true,
            secure: false,
        })
    }

    /// Set whether the outbound Host header is rewritten to the target
    pub fn change_origin(mut self, change_origin: bool) -> Self {
        self.change_origin = change_origin;
        self
    }

    /// Set whether upstream TLS certificates are validated
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn changes_origin(&self) -> bool {
        self.change_origin
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Whether a request path is handled by this rule
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Strip one leading occurrence of the prefix.
    ///
    /// Paths without the prefix come back unchanged, so rewriting an already
    /// rewritten path does nothing.
    pub fn rewrite<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.prefix.as_str()).unwrap_or(path)
    }

    /// Full upstream URL for a request path and optional query string
    pub fn forward_url(&self, path: &str, query: Option<&str>) -> Result<Url, ProxyError> {
        let base = self.target.as_str().trim_end_matches('/');
        let rewritten = self.rewrite(path);

        let mut url = String::with_capacity(base.len() + rewritten.len() + 1);
        url.push_str(base);
        if !rewritten.is_empty() && !rewritten.starts_with('/') {
            // "/apiary" rewrites to "ary"; keep it inside the target's path
            url.push('/');
        }
        url.push_str(rewritten);

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }

        Url::parse(&url).map_err(|e| ProxyError::InvalidForwardUrl {
            url,
            reason: e.to_string(),
        })
    }

    /// Host header value for the outbound request.
    ///
    /// With change-origin on this is the target's host (plus port when it is
    /// not the scheme default), otherwise the incoming Host is kept.
    pub fn outbound_host(&self, incoming: Option<&str>) -> Option<String> {
        if !self.change_origin {
            return incoming.map(str::to_string);
        }

        let host = self.target.host_str()?;
        Some(match self.target.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }
}

fn parse_target(target: &str) -> Result<Url, ProxyError> {
    let mut url = Url::parse(target.trim())
        .map_err(|e| ProxyError::InvalidTarget(format!("{}: {}", target, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ProxyError::InvalidTarget(format!(
            "{}: scheme must be http or https",
            target
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ProxyError::InvalidTarget(format!("{}: missing host", target)));
    }

    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> ProxyRule {
        ProxyRule::new(DEFAULT_PREFIX, "https://bank.5xcamp.us").unwrap()
    }

    #[test]
    fn test_defaults() {
        let rule = rule();
        assert_eq!(rule.prefix(), "/api");
        assert!(rule.changes_origin());
        assert!(!rule.is_secure());
    }

    #[test]
    fn test_rewrite() {
        let rule = rule();
        assert_eq!(rule.rewrite("/api/banks"), "/banks");
        assert_eq!(rule.rewrite("/api"), "");
        assert_eq!(rule.rewrite("/api/api/banks"), "/api/banks");
        assert_eq!(rule.rewrite("/banks/api"), "/banks/api");
    }

    #[test]
    fn test_rewrite_is_noop_on_rewritten_paths() {
        let rule = rule();
        for path in ["/api/banks", "/api/branches/001", "/api"] {
            let once = rule.rewrite(path);
            assert_eq!(rule.rewrite(once), once);
        }
    }

    #[test]
    fn test_matches_prefix_only() {
        let rule = rule();
        assert!(rule.matches("/api"));
        assert!(rule.matches("/api/banks"));
        assert!(rule.matches("/apiary"));
        assert!(!rule.matches("/"));
        assert!(!rule.matches("/004/api"));
        assert!(!rule.matches("/assets/index.js"));
    }

    #[test]
    fn test_forward_url() {
        let url = rule().forward_url("/api/branches/001", None).unwrap();
        assert_eq!(url.as_str(), "https://bank.5xcamp.us/branches/001");
    }

    #[test]
    fn test_forward_url_bare_prefix() {
        let url = rule().forward_url("/api", None).unwrap();
        assert_eq!(url.as_str(), "https://bank.5xcamp.us/");
    }

    #[test]
    fn test_forward_url_keeps_query() {
        let url = rule()
            .forward_url("/api/branches", Some("bank=004&page=2"))
            .unwrap();
        assert_eq!(url.as_str(), "https://bank.5xcamp.us/branches?bank=004&page=2");

        let url = rule().forward_url("/api/branches", Some("")).unwrap();
        assert_eq!(url.as_str(), "https://bank.5xcamp.us/branches");
    }

    #[test]
    fn test_forward_url_target_with_path() {
        let rule = ProxyRule::new("/api", "http://localhost:3000/v1/").unwrap();
        let url = rule.forward_url("/api/banks", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/v1/banks");
    }

    #[test]
    fn test_forward_url_unslashed_remainder() {
        let url = rule().forward_url("/apiary", None).unwrap();
        assert_eq!(url.as_str(), "https://bank.5xcamp.us/ary");
    }

    #[test]
    fn test_outbound_host() {
        let rule = rule();
        assert_eq!(
            rule.outbound_host(Some("localhost:5173")),
            Some("bank.5xcamp.us".to_string())
        );

        let rule = ProxyRule::new("/api", "http://127.0.0.1:8080").unwrap();
        assert_eq!(rule.outbound_host(None), Some("127.0.0.1:8080".to_string()));

        let rule = rule.change_origin(false);
        assert_eq!(
            rule.outbound_host(Some("localhost:5173")),
            Some("localhost:5173".to_string())
        );
        assert_eq!(rule.outbound_host(None), None);
    }

    #[test]
    fn test_invalid_targets() {
        assert!(matches!(
            ProxyRule::new("/api", ""),
            Err(ProxyError::InvalidTarget(_))
        ));
        assert!(matches!(
            ProxyRule::new("/api", "bank.5xcamp.us"),
            Err(ProxyError::InvalidTarget(_))
        ));
        assert!(matches!(
            ProxyRule::new("/api", "ftp://bank.5xcamp.us"),
            Err(ProxyError::InvalidTarget(_))
        ));
    }
}
