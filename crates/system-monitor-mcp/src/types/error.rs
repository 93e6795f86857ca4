//! Error types and JSON-RPC error codes for the MCP server.

use super::message::{JsonRpcResponse, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// All errors that can occur in the MCP server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// A known method this server does not implement.
    #[error("{0}")]
    Unsupported(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::MethodNotFound(_) | McpError::Unsupported(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) | McpError::UnknownTool(_) => INVALID_PARAMS,
            McpError::InternalError(_) | McpError::Io(_) | McpError::Json(_) => INTERNAL_ERROR,
        }
    }

    pub fn to_response(&self, id: Option<RequestId>) -> JsonRpcResponse {
        JsonRpcResponse::error(id, self.code(), self.to_string())
    }
}

pub type McpResult<T> = Result<T, McpError>;
