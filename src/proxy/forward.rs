//! Request Forwarding
//!
//! Relays requests matched by a [`ProxyRule`] to the target origin and
//! streams the upstream response back unmodified. No retries, no redirect
//! following, no response rewriting.

use axum::{
    body::{Body, HttpBody},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName},
    middleware::Next,
    response::{IntoResponse, Response},
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::error::ProxyError;
use super::rule::ProxyRule;

/// Headers scoped to a single connection, never forwarded in either direction
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Forwards requests for one proxy rule
pub struct Forwarder {
    rule: ProxyRule,
    client: Client,
}

impl Forwarder {
    /// Build a forwarder and its HTTP client.
    ///
    /// `timeout` of `None` leaves upstream requests unbounded.
    pub fn new(rule: ProxyRule, timeout: Option<Duration>) -> Result<Self, ProxyError> {
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(!rule.is_secure())
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy();

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(ProxyError::Client)?;

        Ok(Self { rule, client })
    }

    pub fn rule(&self) -> &ProxyRule {
        &self.rule
    }

    /// Forward a request to the target origin.
    ///
    /// Method, headers and body are kept. The Host header is set by the rule
    /// and hop-by-hop headers are dropped. The body is streamed through
    /// without buffering.
    pub async fn forward(&self, request: Request) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();

        let url = self
            .rule
            .forward_url(parts.uri.path(), parts.uri.query())?;

        tracing::debug!(
            method = %parts.method,
            path = %parts.uri.path(),
            upstream = %url,
            "Forwarding request"
        );

        let incoming_host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok());
        let outbound_host = self.rule.outbound_host(incoming_host);

        let mut upstream = self
            .client
            .request(parts.method.clone(), url.clone())
            .headers(forwardable_headers(&parts.headers, &[header::HOST]));

        if let Some(host) = outbound_host {
            upstream = upstream.header(header::HOST, host);
        }
        if !body.is_end_stream() {
            upstream = upstream.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let response = upstream.send().await.map_err(|e| {
            tracing::warn!(upstream = %url, error = %e, "Upstream request failed");
            ProxyError::from(e)
        })?;

        tracing::debug!(upstream = %url, status = %response.status(), "Upstream responded");

        relay_response(response)
    }
}

/// Middleware sending every request under the rule's prefix to the upstream.
///
/// Other requests continue down the stack untouched.
pub async fn proxy_requests(
    State(forwarder): State<Arc<Forwarder>>,
    request: Request,
    next: Next,
) -> Response {
    if !forwarder.rule().matches(request.uri().path()) {
        return next.run(request).await;
    }

    match forwarder.forward(request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// Turn an upstream response into ours, streaming the body through
fn relay_response(upstream: reqwest::Response) -> Result<Response, ProxyError> {
    let status = upstream.status();
    let headers = forwardable_headers(upstream.headers(), &[]);

    let mut response = Response::builder()
        .status(status)
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| ProxyError::Response(e.to_string()))?;
    *response.headers_mut() = headers;

    Ok(response)
}

/// Copy of `headers` without hop-by-hop headers and without `extra`.
///
/// Headers listed in `Connection` are hop-by-hop too (RFC 7230 section 6.1).
fn forwardable_headers(headers: &HeaderMap, extra: &[HeaderName]) -> HeaderMap {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect();

    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if HOP_BY_HOP.contains(name) || extra.contains(name) || listed.contains(name) {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    forwarded
}
