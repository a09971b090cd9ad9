//! JSON-RPC 2.0 framing helpers.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const SERVER_NOT_INITIALIZED: i64 = -32002;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    #[serde(rename = "jsonrpc")]
    pub _jsonrpc: Option<String>,
    pub method: String,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Requests without an id are notifications and never get a reply.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

pub fn json_rpc_response(id: Option<Value>, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub fn json_rpc_error(id: Option<Value>, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

/// A tool answer as MCP text content: the payload pretty-printed.
pub fn tool_text_content<P: Serialize>(payload: &P) -> Value {
    let text = serde_json::to_string_pretty(payload)
        .unwrap_or_else(|e| format!("{{\"success\": false, \"error\": \"{e}\"}}"));
    json!({ "type": "text", "text": text })
}

/// Key under which an in-flight request is tracked for cancellation.
///
/// Uses the JSON text of the id, so `1` and `"1"` stay distinct.
pub fn request_key(id: &Value) -> String {
    id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_jsonrpc_field_parses() {
        let request: JsonRpcRequest =
            serde_json::from_value(json!({"method": "ping", "id": 3})).unwrap();

        assert_eq!(request.method, "ping");
        assert_eq!(request.id, Some(json!(3)));
        assert!(!request.is_notification());
    }

    #[test]
    fn test_notification_has_no_id() {
        let request: JsonRpcRequest = serde_json::from_value(
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .unwrap();

        assert!(request.is_notification());
    }

    #[test]
    fn test_error_shape() {
        assert_eq!(
            json_rpc_error(Some(json!("a")), METHOD_NOT_FOUND, "Method not found: x"),
            json!({
                "jsonrpc": "2.0",
                "id": "a",
                "error": {"code": -32601, "message": "Method not found: x"}
            })
        );
    }

    #[test]
    fn test_tool_text_content_is_pretty_json() {
        let content = tool_text_content(&json!({"success": true}));

        assert_eq!(content["type"], json!("text"));
        assert_eq!(content["text"], json!("{\n  \"success\": true\n}"));
    }

    #[test]
    fn test_request_key_distinguishes_types() {
        assert_ne!(request_key(&json!(1)), request_key(&json!("1")));
    }
}
