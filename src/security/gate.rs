//! Security gate middleware.
//!
//! Runs in front of every route. Cross-origin requests are logged, never
//! blocked. Responses from API paths get a version marker and a no-cache
//! directive whatever the handler returned.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, Uri},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::observability::metrics;

pub const X_API_VERSION: &str = "x-api-version";
pub const NO_CACHE: &str = "no-store, no-cache, must-revalidate";

/// State for the security gate.
#[derive(Clone)]
pub struct GateState {
    api_prefix: Arc<str>,
    api_version: HeaderValue,
}

impl GateState {
    pub fn from_config(config: &SecurityConfig) -> Self {
        let api_version = HeaderValue::from_str(&config.api_version).unwrap_or_else(|_| {
            tracing::warn!(value = %config.api_version, "Invalid api_version header value, using 1.0");
            HeaderValue::from_static("1.0")
        });
        Self {
            api_prefix: config.api_prefix.trim_end_matches('/').into(),
            api_version,
        }
    }

    fn is_api_path(&self, path: &str) -> bool {
        match path.strip_prefix(&*self.api_prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Returns the origin when it does not mention the request's own host.
fn foreign_origin<'a>(headers: &'a HeaderMap, uri: &Uri) -> Option<&'a str> {
    let origin = headers.get(header::ORIGIN)?.to_str().ok()?;
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()));

    match host {
        Some(host) if origin.contains(host) => None,
        _ => Some(origin),
    }
}

pub async fn security_gate(
    State(state): State<GateState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(origin) = foreign_origin(request.headers(), request.uri()) {
        tracing::warn!(
            origin = %origin,
            path = %request.uri().path(),
            "Cross-origin request"
        );
        metrics::record_cross_origin();
    }

    if !state.is_api_path(request.uri().path()) {
        return next.run(request).await;
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(X_API_VERSION, state.api_version.clone());
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    response
}
