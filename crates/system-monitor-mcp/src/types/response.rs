//! MCP response types for tool listing and tool calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix on the text of a failed tool call.
pub const TOOL_ERROR_PREFIX: &str = "❌ ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(default, rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolCallResult {
    pub fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
            is_error: None,
        }
    }

    /// A tool-level failure. Still a successful JSON-RPC result.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: format!("{TOOL_ERROR_PREFIX}{message}"),
            }],
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}

/// JSON Schema for a tool's arguments. Always an object of named properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, Property>,
}

impl Default for InputSchema {
    fn default() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
        }
    }
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: impl Into<String>, property: Property) -> Self {
        self.properties.insert(name.into(), property);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: String,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Property {
    /// A string-typed property. Every argument this server accepts is a string.
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            property_type: "string".to_string(),
            description: description.into(),
            allowed: None,
            default: None,
        }
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListResult {
    pub tools: Vec<ToolDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_result_shape() {
        let value = serde_json::to_value(ToolCallResult::error("disk on fire")).unwrap();
        assert_eq!(
            value,
            json!({
                "content": [{ "type": "text", "text": "❌ disk on fire" }],
                "isError": true
            })
        );
    }

    #[test]
    fn test_text_result_omits_is_error() {
        let value = serde_json::to_value(ToolCallResult::text("ok".into())).unwrap();
        assert!(value.get("isError").is_none());
        assert_eq!(value["content"][0]["text"], "ok");
    }

    #[test]
    fn test_schema_serialization() {
        let schema = InputSchema::new().property(
            "sort_by",
            Property::string("Sort key").one_of(&["cpu", "memory"]).with_default("memory"),
        );
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["sort_by"]["type"], "string");
        assert_eq!(value["properties"]["sort_by"]["enum"], json!(["cpu", "memory"]));
        assert_eq!(value["properties"]["sort_by"]["default"], "memory");
    }
}
