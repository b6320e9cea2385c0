//! Forwarding gateway bridging dashboard clients and the upstream tool
//! server.
//!
//! A single `POST /api/mcp-proxy` route validates minimal envelope shape,
//! forwards the body unchanged to the configured upstream address and relays
//! the upstream response. Any failure on the upstream leg is converted into
//! a synthesized error envelope with HTTP 500.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::mcp::protocol::PROTOCOL_VERSION;

/// Route served by the gateway.
pub const PROXY_PATH: &str = "/api/mcp-proxy";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Hop-by-hop and framing headers that must not cross the proxy on either
/// leg; reqwest and axum compute their own framing.
const SKIPPED_HEADERS: [&str; 5] = [
    "host",
    "content-length",
    "connection",
    "transfer-encoding",
    "accept-encoding",
];

#[derive(Clone)]
pub struct AppState {
    upstream_url: String,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DashboardError::ConfigError(e.to_string()))?;

        Ok(AppState {
            upstream_url: config.upstream_url.clone(),
            http,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(PROXY_PATH, post(proxy_post))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn proxy_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let envelope: Value = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(_) => return validation_error("request body is not valid JSON"),
    };

    if let Err(e) = validate_envelope(&envelope) {
        return validation_error(&e.to_string());
    }

    match forward(&state, &headers, body).await {
        Ok(response) => response,
        Err(e) => {
            error!("Proxy error: {}", e);

            let envelope = json!({
                "protocolVersion": PROTOCOL_VERSION,
                "id": 0,
                "error": {
                    "code": -32603,
                    "message": e.to_string(),
                },
            });

            (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
        }
    }
}

fn validation_error(reason: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response()
}

/// Minimal shape check on the inbound envelope.
///
/// `id` is deliberately a presence check: `0` is a legal request id, so
/// truthiness must not be used here.
fn validate_envelope(envelope: &Value) -> Result<()> {
    let fields = envelope.as_object().ok_or_else(|| {
        DashboardError::InvalidRequest("request envelope must be a JSON object".to_string())
    })?;

    match fields.get("protocolVersion").and_then(Value::as_str) {
        Some(version) if !version.is_empty() => {}
        _ => {
            return Err(DashboardError::InvalidRequest(
                "missing protocolVersion".to_string(),
            ))
        }
    }

    match fields.get("method").and_then(Value::as_str) {
        Some(method) if !method.is_empty() => {}
        _ => return Err(DashboardError::InvalidRequest("missing method".to_string())),
    }

    match fields.get("id") {
        Some(id) if !id.is_null() => Ok(()),
        _ => Err(DashboardError::InvalidRequest("missing id".to_string())),
    }
}

/// Forward the raw body to the upstream address and relay the response.
async fn forward(state: &AppState, caller_headers: &HeaderMap, body: Bytes) -> Result<Response> {
    debug!("Forwarding envelope to {}", state.upstream_url);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/event-stream"),
    );
    merge_caller_headers(&mut headers, caller_headers);

    let upstream = state
        .http
        .post(&state.upstream_url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| DashboardError::NetworkError(format!("upstream unreachable: {}", e)))?;

    let status = upstream.status();
    if !status.is_success() {
        return Err(DashboardError::UpstreamError(format!(
            "upstream responded with status: {}",
            status
        )));
    }

    let upstream_headers = upstream.headers().clone();
    let envelope: Value = upstream
        .json()
        .await
        .map_err(|e| DashboardError::UpstreamError(format!("invalid upstream body: {}", e)))?;

    let mut response = (status, Json(envelope)).into_response();
    for (name, value) in &upstream_headers {
        if is_skipped(name.as_str()) {
            continue;
        }
        response.headers_mut().insert(name.clone(), value.clone());
    }

    Ok(response)
}

/// Header merge policy: caller-supplied headers override the gateway's
/// defaults where they collide. This carries the session header through the
/// proxy without the gateway knowing about it.
fn merge_caller_headers(headers: &mut HeaderMap, caller: &HeaderMap) {
    for (name, value) in caller {
        if is_skipped(name.as_str()) {
            continue;
        }
        headers.insert(name.clone(), value.clone());
    }
}

fn is_skipped(name: &str) -> bool {
    SKIPPED_HEADERS
        .iter()
        .any(|skipped| name.eq_ignore_ascii_case(skipped))
}
