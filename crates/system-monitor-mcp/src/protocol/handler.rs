//! Main request dispatcher: routes JSON-RPC requests to protocol operations.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::tools::ToolRegistry;
use crate::types::*;

use super::negotiation::negotiate;

/// Stateless router from method name to protocol operation.
///
/// The `jsonrpc` tag is not checked and an empty method is just an unknown
/// one. Returns `None` for methods that never answer. Whether a response is written
/// at all is decided by the transport, which also suppresses every reply to a
/// notification.
pub struct ProtocolHandler {
    registry: Arc<ToolRegistry>,
    server_info: Implementation,
}

impl ProtocolHandler {
    pub fn new(registry: ToolRegistry, server_info: Implementation) -> Self {
        Self {
            registry: Arc::new(registry),
            server_info,
        }
    }

    /// Identity reported by `initialize`.
    pub fn server_info(&self) -> &Implementation {
        &self.server_info
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone();

        match self.dispatch(&request).await {
            Ok(Some(value)) => Some(JsonRpcResponse::success(id, value)),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Request {} failed: {e}", request.method);
                Some(e.to_response(id))
            }
        }
    }

    async fn dispatch(&self, request: &JsonRpcRequest) -> McpResult<Option<Value>> {
        let params = request.params.as_ref();
        let value = match request.method.as_str() {
            "initialize" => to_value(negotiate(params, &self.server_info))?,
            "notifications/initialized" | "initialized" => {
                tracing::info!("MCP handshake complete");
                return Ok(None);
            }

            "tools/list" => self.handle_tools_list()?,
            "tools/call" => self.handle_tools_call(params).await?,

            "prompts/list" => json!({ "prompts": [] }),
            "resources/list" => json!({ "resources": [] }),
            "resources/read" => {
                return Err(McpError::Unsupported(
                    "Resource reading not implemented".to_string(),
                ))
            }

            other => return Err(McpError::MethodNotFound(other.to_string())),
        };
        Ok(Some(value))
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        to_value(ToolListResult {
            tools: self.registry.list(),
        })
    }

    async fn handle_tools_call(&self, params: Option<&Value>) -> McpResult<Value> {
        let call: ToolCallParams = params
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("Tool call params required".to_string()))?;

        let tool = self
            .registry
            .lookup(&call.name)
            .ok_or_else(|| McpError::UnknownTool(call.name.clone()))?;
        let args = call.arguments.unwrap_or_default();

        tracing::debug!("Calling tool {}", call.name);
        let executed = tokio::task::spawn_blocking(move || tool.execute(&args)).await;

        let result = match executed {
            Ok(Ok(text)) => ToolCallResult::text(text),
            Ok(Err(e)) => {
                tracing::warn!("Tool {} failed: {e}", call.name);
                ToolCallResult::error(e)
            }
            Err(e) => {
                tracing::error!("Tool {} did not complete: {e}", call.name);
                ToolCallResult::error(format!("Tool {} did not complete", call.name))
            }
        };

        to_value(result)
    }
}

fn to_value(value: impl serde::Serialize) -> McpResult<Value> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Tool, ToolError};

    struct Echo;

    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the text argument"
        }

        fn input_schema(&self) -> InputSchema {
            InputSchema::new().property("text", Property::string("Text to echo"))
        }

        fn execute(&self, args: &Arguments) -> Result<String, ToolError> {
            match args.get("text").and_then(Value::as_str) {
                Some(text) => Ok(text.to_string()),
                None => Err(ToolError::Failed("text is required".to_string())),
            }
        }
    }

    fn handler() -> ProtocolHandler {
        ProtocolHandler::new(ToolRegistry::new().with_tool(Echo), Implementation::default())
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest::new(Some(RequestId::from(1)), method, params)
    }

    #[tokio::test]
    async fn test_initialize_result() {
        let resp = handler().handle_request(request("initialize", None)).await.unwrap();
        let result = resp.result().unwrap();
        assert_eq!(result["protocolVersion"], MCP_VERSION);
        assert_eq!(result["serverInfo"]["name"], "system-monitor-mcp");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], true);
        assert_eq!(result["capabilities"]["resources"]["subscribe"], false);
        assert_eq!(result["capabilities"]["prompts"]["listChanged"], false);
    }

    #[test]
    fn test_accessors() {
        let h = handler();
        assert_eq!(h.server_info().name, "system-monitor-mcp");
        assert_eq!(h.registry().names(), vec!["echo"]);
    }

    #[tokio::test]
    async fn test_initialized_never_answers() {
        let h = handler();
        assert!(h.handle_request(request("notifications/initialized", None)).await.is_none());
        assert!(h.handle_request(request("initialized", None)).await.is_none());
    }

    #[tokio::test]
    async fn test_tool_call_success() {
        let params = json!({ "name": "echo", "arguments": { "text": "hi" } });
        let resp = handler().handle_request(request("tools/call", Some(params))).await.unwrap();
        let result = resp.result().unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "hi");
        assert!(result.get("isError").is_none());

        let parsed: ToolCallResult = serde_json::from_value(result.clone()).unwrap();
        assert!(!parsed.is_error());
    }

    #[tokio::test]
    async fn test_tool_failure_is_flagged_content() {
        let params = json!({ "name": "echo" });
        let resp = handler().handle_request(request("tools/call", Some(params))).await.unwrap();
        assert!(resp.error_object().is_none());
        let result = resp.result().unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "❌ text is required");

        let parsed: ToolCallResult = serde_json::from_value(result.clone()).unwrap();
        assert!(parsed.is_error());
    }

    #[tokio::test]
    async fn test_tool_call_param_errors() {
        let h = handler();

        let resp = h.handle_request(request("tools/call", None)).await.unwrap();
        assert_eq!(resp.error_object().unwrap().code, error_codes::INVALID_PARAMS);

        let resp = h
            .handle_request(request("tools/call", Some(json!({ "arguments": {} }))))
            .await
            .unwrap();
        assert_eq!(resp.error_object().unwrap().code, error_codes::INVALID_PARAMS);

        let resp = h
            .handle_request(request("tools/call", Some(json!({ "name": "nope" }))))
            .await
            .unwrap();
        let err = resp.error_object().unwrap();
        assert_eq!(err.code, error_codes::INVALID_PARAMS);
        assert_eq!(err.message, "Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_stub_capabilities() {
        let h = handler();
        let prompts = h.handle_request(request("prompts/list", None)).await.unwrap();
        assert_eq!(prompts.result().unwrap(), &json!({ "prompts": [] }));

        let resources = h.handle_request(request("resources/list", None)).await.unwrap();
        assert_eq!(resources.result().unwrap(), &json!({ "resources": [] }));

        let read = h.handle_request(request("resources/read", None)).await.unwrap();
        assert_eq!(read.error_object().unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let resp = handler().handle_request(request("ping", None)).await.unwrap();
        let err = resp.error_object().unwrap();
        assert_eq!(err.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not found: ping");
    }

    #[tokio::test]
    async fn test_empty_method_is_unknown() {
        let resp = handler().handle_request(request("", None)).await.unwrap();
        let err = resp.error_object().unwrap();
        assert_eq!(err.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not found: ");
    }

    #[tokio::test]
    async fn test_jsonrpc_tag_is_not_checked() {
        let mut req = request("tools/list", None);
        req.jsonrpc = Some("1.0".to_string());
        let resp = handler().handle_request(req).await.unwrap();
        assert_eq!(resp.result().unwrap()["tools"][0]["name"], "echo");
    }
}
