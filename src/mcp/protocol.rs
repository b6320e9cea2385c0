use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DashboardError, Result};

/// Envelope version carried on every request and response.
pub const PROTOCOL_VERSION: &str = "2.0";

/// Protocol revision advertised to the upstream server during the handshake.
pub const HANDSHAKE_VERSION: &str = "2025-06-18";

/// Header carrying the session identifier in both directions.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Request envelope format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub id: i64,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, id: i64, params: Value) -> Self {
        JsonRpcRequest {
            protocol_version: PROTOCOL_VERSION.to_string(),
            method: method.into(),
            params: Some(params),
            id,
        }
    }
}

/// Response envelope format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Unwrap the tool payload from a response envelope.
    ///
    /// An error envelope fails with the upstream code and message. A success
    /// envelope yields, in order of precedence, `result.structuredContent`,
    /// `result.content`, or the raw `result` value; if none of them carries
    /// data the call fails with [`DashboardError::EmptyResult`].
    pub fn into_tool_payload(self) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(DashboardError::ProtocolError {
                code: error.code,
                message: error.message,
            });
        }

        let mut result = self.result.unwrap_or(Value::Null);

        if let Value::Object(ref mut fields) = result {
            for key in ["structuredContent", "content"] {
                if let Some(payload) = fields.remove(key) {
                    if !payload.is_null() {
                        return Ok(payload);
                    }
                }
            }
        }

        if result.is_null() {
            return Err(DashboardError::EmptyResult);
        }

        Ok(result)
    }
}
