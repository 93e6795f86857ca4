//! JSON-RPC 2.0 envelopes for the MCP protocol.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// JSON-RPC 2.0 protocol version.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier. Any JSON scalar except `null`; it is echoed back with
/// its original type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
    Bool(bool),
}

impl RequestId {
    /// Interpret a raw JSON value as an id. `null`, arrays and objects yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(RequestId::Number(n.clone())),
            Value::String(s) => Some(RequestId::String(s.clone())),
            Value::Bool(b) => Some(RequestId::Bool(*b)),
            _ => None,
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// An incoming JSON-RPC message.
///
/// `id` absent or `null` marks a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: Option<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id,
            method: method.into(),
            params,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// A JSON-RPC 2.0 response: exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseOutcome {
    Result(Value),
    Error(JsonRpcErrorObject),
}

/// Error object within a JSON-RPC error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: ResponseOutcome::Result(result),
        }
    }

    pub fn error(id: Option<RequestId>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: ResponseOutcome::Error(JsonRpcErrorObject {
                code,
                message,
                data: None,
            }),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            ResponseOutcome::Result(value) => Some(value),
            ResponseOutcome::Error(_) => None,
        }
    }

    pub fn error_object(&self) -> Option<&JsonRpcErrorObject> {
        match &self.outcome {
            ResponseOutcome::Result(_) => None,
            ResponseOutcome::Error(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_missing_id_are_notifications() {
        let missing: JsonRpcRequest =
            serde_json::from_value(json!({"method": "notifications/initialized"})).unwrap();
        let null: JsonRpcRequest =
            serde_json::from_value(json!({"id": null, "method": "tools/list"})).unwrap();
        assert!(missing.is_notification());
        assert!(null.is_notification());
    }

    #[test]
    fn test_jsonrpc_field_is_optional() {
        let req: JsonRpcRequest =
            serde_json::from_value(json!({"id": 1, "method": "tools/list"})).unwrap();
        assert_eq!(req.id, Some(RequestId::from(1)));
        assert!(req.jsonrpc.is_none());
    }

    #[test]
    fn test_response_has_result_xor_error() {
        let ok = serde_json::to_value(JsonRpcResponse::success(
            Some(RequestId::from(1)),
            json!({"x": 1}),
        ))
        .unwrap();
        assert_eq!(ok, json!({"jsonrpc": "2.0", "id": 1, "result": {"x": 1}}));

        let err = serde_json::to_value(JsonRpcResponse::error(
            Some(RequestId::from("a")),
            -32601,
            "Method not found: x".to_string(),
        ))
        .unwrap();
        assert_eq!(
            err,
            json!({
                "jsonrpc": "2.0",
                "id": "a",
                "error": {"code": -32601, "message": "Method not found: x"}
            })
        );
    }

    #[test]
    fn test_id_type_survives_roundtrip() {
        for id in [json!(7), json!(-3), json!(2.5), json!("7"), json!(""), json!(true), json!(false)] {
            let parsed = RequestId::from_value(&id).unwrap();
            let line = serde_json::to_string(&JsonRpcResponse::success(
                Some(parsed.clone()),
                json!({}),
            ))
            .unwrap();
            let back: JsonRpcResponse = serde_json::from_str(&line).unwrap();
            assert_eq!(back.id, Some(parsed));

            let raw: Value = serde_json::from_str(&line).unwrap();
            assert_eq!(raw["id"], id, "id must keep its JSON type");
        }
    }

    #[test]
    fn test_non_scalar_ids_are_not_recoverable() {
        assert!(RequestId::from_value(&Value::Null).is_none());
        assert!(RequestId::from_value(&json!([1])).is_none());
        assert!(RequestId::from_value(&json!({"a": 1})).is_none());
    }

    #[test]
    fn test_bool_id_is_a_request() {
        let req: JsonRpcRequest =
            serde_json::from_value(json!({"id": true, "method": "tools/list"})).unwrap();
        assert_eq!(req.id, Some(RequestId::Bool(true)));
        assert!(!req.is_notification());
    }
}
