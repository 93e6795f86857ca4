//! System Monitor MCP Server: host metrics as MCP tools over line-delimited JSON-RPC.

pub mod config;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_data_dir, ServerConfig};
pub use protocol::ProtocolHandler;
pub use tools::{MetricCache, Tool, ToolError, ToolRegistry};
pub use transport::{StdioTransport, StopHandle};
