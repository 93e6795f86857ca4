//! MCP request parameter types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tool arguments: a mapping from argument name to an arbitrary JSON value.
pub type Arguments = Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Arguments>,
}
