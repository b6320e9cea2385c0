use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse, HANDSHAKE_VERSION, SESSION_HEADER};

const ACCEPT_VALUE: &str = "application/json, text/event-stream";
const CLIENT_NAME: &str = "defi-dashboard";

/// Fixed ids for the two handshake requests. Tool calls use a
/// timestamp-derived id instead (collisions accepted, not mitigated).
const INITIALIZE_ID: i64 = 1;
const INITIALIZED_ID: i64 = 2;

/// Opaque token binding tool calls to an established handshake context.
///
/// Returned by [`ToolClient::initialize`] and passed by reference into every
/// [`ToolClient::call_tool`]; the client itself holds no session state, so
/// the caller decides whether a session is shared.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Client for invoking named tools on the upstream server through the
/// forwarding gateway.
#[derive(Clone)]
pub struct ToolClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ToolClient {
    /// Create a client targeting a gateway endpoint.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();

        endpoint.parse::<url::Url>().map_err(|_| {
            DashboardError::ConfigError(format!("Invalid gateway URL: {}", endpoint))
        })?;

        Ok(ToolClient {
            http: reqwest::Client::new(),
            endpoint,
        })
    }

    async fn post(
        &self,
        request: &JsonRpcRequest,
        session: Option<&Session>,
    ) -> Result<reqwest::Response> {
        let mut builder = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ACCEPT_VALUE)
            .json(request);

        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session.id());
        }

        builder
            .send()
            .await
            .map_err(|e| DashboardError::NetworkError(e.to_string()))
    }

    /// Perform the two-step handshake and return the established session.
    ///
    /// The upstream server must answer the `initialize` request with a
    /// session identifier in the `mcp-session-id` response header; a missing
    /// header is fatal. The follow-up `notifications/initialized` round trip
    /// is awaited but its body is ignored.
    pub async fn initialize(&self) -> Result<Session> {
        debug!("Initializing tool session via {}", self.endpoint);

        let request = JsonRpcRequest::new(
            "initialize",
            INITIALIZE_ID,
            json!({
                "protocolVersion": HANDSHAKE_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": CLIENT_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        );

        let response = self.post(&request, None).await?;

        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| {
                DashboardError::SessionError(
                    "initialize response carried no session header".to_string(),
                )
            })?;

        let session = Session { id: session_id };

        let notification =
            JsonRpcRequest::new("notifications/initialized", INITIALIZED_ID, json!({}));
        self.post(&notification, Some(&session)).await?;

        info!("Tool session established");
        Ok(session)
    }

    /// Invoke a named tool under an established session and deserialize the
    /// unwrapped payload into the caller's expected shape.
    pub async fn call_tool<T: DeserializeOwned>(
        &self,
        session: &Session,
        name: &str,
        arguments: Value,
    ) -> Result<T> {
        debug!("Calling tool: {}", name);

        let request = JsonRpcRequest::new(
            "tools/call",
            chrono::Utc::now().timestamp_millis(),
            json!({
                "name": name,
                "arguments": arguments,
            }),
        );

        let response = self.post(&request, Some(session)).await?;

        let envelope: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::UpstreamError(format!("Invalid tool response: {}", e)))?;

        let payload = envelope.into_tool_payload()?;

        serde_json::from_value(payload).map_err(|e| {
            DashboardError::UpstreamError(format!("Unexpected payload for {}: {}", name, e))
        })
    }
}
