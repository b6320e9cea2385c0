//! Integration tests for the forwarding gateway at `/api/mcp-proxy`.
//!
//! These tests verify that:
//! - Valid envelopes are forwarded to the upstream server and the upstream
//!   response (status, body, headers) is relayed back
//! - Malformed envelopes are rejected with HTTP 400 without contacting
//!   upstream, with `id` treated as a presence check (`id: 0` is legal)
//! - Upstream failures are converted into a synthesized -32603 envelope
//! - The full client handshake and a tool call work through a live gateway

use std::net::SocketAddr;
use std::time::Duration;

use mockito::Matcher;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use defi_dashboard::gateway::{router, AppState, PROXY_PATH};
use defi_dashboard::{Config, ToolClient};

async fn start_gateway(upstream_url: String) -> SocketAddr {
    let config = Config::from_url(upstream_url);
    let app = router(AppState::new(&config).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

fn proxy_url(addr: SocketAddr) -> String {
    format!("http://{}{}", addr, PROXY_PATH)
}

fn valid_envelope() -> Value {
    json!({
        "protocolVersion": "2.0",
        "method": "tools/call",
        "id": 7,
        "params": {
            "name": "get_token_prices",
            "arguments": {"tokens": ["ETH"]},
        },
    })
}

// ── Forwarding ─────────────────────────────────────────────────

#[tokio::test]
async fn test_valid_envelope_forwarded_and_relayed() {
    let mut upstream = mockito::Server::new_async().await;
    let body = valid_envelope().to_string();

    let reply = json!({
        "protocolVersion": "2.0",
        "id": 7,
        "result": {"structuredContent": {"ETH": {"usd": 3000.0}}},
    });

    let forwarded = upstream
        .mock("POST", "/mcp/")
        .match_body(Matcher::Exact(body.clone()))
        .with_header("mcp-session-id", "sess-9")
        .with_body(reply.to_string())
        .create_async()
        .await;

    let addr = start_gateway(format!("{}/mcp/", upstream.url())).await;

    let response = reqwest::Client::new()
        .post(proxy_url(addr))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("mcp-session-id").unwrap(),
        "sess-9",
        "upstream response headers should be relayed"
    );

    let relayed: Value = response.json().await.unwrap();
    assert_eq!(relayed, reply);
    forwarded.assert_async().await;
}

#[tokio::test]
async fn test_caller_headers_reach_upstream() {
    let mut upstream = mockito::Server::new_async().await;

    // Caller's accept overrides the gateway default; the session header is
    // carried through untouched.
    let forwarded = upstream
        .mock("POST", "/mcp/")
        .match_header("accept", "application/json")
        .match_header("mcp-session-id", "sess-1")
        .with_body(json!({"protocolVersion": "2.0", "id": 7, "result": {}}).to_string())
        .create_async()
        .await;

    let addr = start_gateway(format!("{}/mcp/", upstream.url())).await;

    let response = reqwest::Client::new()
        .post(proxy_url(addr))
        .header("accept", "application/json")
        .header("mcp-session-id", "sess-1")
        .json(&valid_envelope())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    forwarded.assert_async().await;
}

// ── Validation ─────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_method_rejected_without_upstream() {
    let mut upstream = mockito::Server::new_async().await;
    let untouched = upstream
        .mock("POST", "/mcp/")
        .expect(0)
        .create_async()
        .await;

    let addr = start_gateway(format!("{}/mcp/", upstream.url())).await;

    let mut envelope = valid_envelope();
    envelope.as_object_mut().unwrap().remove("method");

    let response = reqwest::Client::new()
        .post(proxy_url(addr))
        .json(&envelope)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_zero_id_is_forwarded() {
    let mut upstream = mockito::Server::new_async().await;

    let forwarded = upstream
        .mock("POST", "/mcp/")
        .match_body(Matcher::PartialJson(json!({"id": 0})))
        .with_body(json!({"protocolVersion": "2.0", "id": 0, "result": {}}).to_string())
        .create_async()
        .await;

    let addr = start_gateway(format!("{}/mcp/", upstream.url())).await;

    let mut envelope = valid_envelope();
    envelope["id"] = json!(0);

    let response = reqwest::Client::new()
        .post(proxy_url(addr))
        .json(&envelope)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    forwarded.assert_async().await;
}

#[tokio::test]
async fn test_missing_id_rejected() {
    let addr = start_gateway("http://127.0.0.1:9/mcp/".to_string()).await;

    let mut envelope = valid_envelope();
    envelope.as_object_mut().unwrap().remove("id");

    let response = reqwest::Client::new()
        .post(proxy_url(addr))
        .json(&envelope)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_non_json_body_rejected() {
    let addr = start_gateway("http://127.0.0.1:9/mcp/".to_string()).await;

    let response = reqwest::Client::new()
        .post(proxy_url(addr))
        .body("not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

// ── Failure path ───────────────────────────────────────────────

#[tokio::test]
async fn test_upstream_503_yields_synthesized_envelope() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("POST", "/mcp/")
        .with_status(503)
        .create_async()
        .await;

    let addr = start_gateway(format!("{}/mcp/", upstream.url())).await;

    let response = reqwest::Client::new()
        .post(proxy_url(addr))
        .json(&valid_envelope())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["protocolVersion"], "2.0");
    assert_eq!(body["id"], 0);
    assert_eq!(body["error"]["code"], -32603);
    assert!(body["error"]["message"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_unreachable_upstream_yields_synthesized_envelope() {
    // Port 9 (discard) is not listening.
    let addr = start_gateway("http://127.0.0.1:9/mcp/".to_string()).await;

    let response = reqwest::Client::new()
        .post(proxy_url(addr))
        .json(&valid_envelope())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], -32603);
}

// ── Full chain: client -> gateway -> upstream ──────────────────

#[tokio::test]
async fn test_client_handshake_and_tool_call_through_gateway() {
    let mut upstream = mockito::Server::new_async().await;

    let init = upstream
        .mock("POST", "/mcp/")
        .match_body(Matcher::PartialJson(json!({"method": "initialize", "id": 1})))
        .with_header("mcp-session-id", "sess-42")
        .with_body(json!({"protocolVersion": "2.0", "id": 1, "result": {}}).to_string())
        .create_async()
        .await;

    let notified = upstream
        .mock("POST", "/mcp/")
        .match_header("mcp-session-id", "sess-42")
        .match_body(Matcher::PartialJson(
            json!({"method": "notifications/initialized"}),
        ))
        .with_body(json!({"protocolVersion": "2.0", "id": 2, "result": {}}).to_string())
        .create_async()
        .await;

    let call = upstream
        .mock("POST", "/mcp/")
        .match_header("mcp-session-id", "sess-42")
        .match_body(Matcher::PartialJson(json!({
            "method": "tools/call",
            "params": {"name": "get_token_prices", "arguments": {"tokens": ["ETH"]}},
        })))
        .with_body(
            json!({
                "protocolVersion": "2.0",
                "id": 123,
                "result": {"structuredContent": {"usd": 3500}},
            })
            .to_string(),
        )
        .create_async()
        .await;

    let addr = start_gateway(format!("{}/mcp/", upstream.url())).await;
    let client = ToolClient::new(proxy_url(addr)).unwrap();

    let session = client.initialize().await.unwrap();
    assert_eq!(session.id(), "sess-42");

    let payload: Value = client
        .call_tool(&session, "get_token_prices", json!({"tokens": ["ETH"]}))
        .await
        .unwrap();

    assert_eq!(payload, json!({"usd": 3500}));

    init.assert_async().await;
    notified.assert_async().await;
    call.assert_async().await;
}
