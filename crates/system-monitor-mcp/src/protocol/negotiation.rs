//! The `initialize` handshake.

use serde_json::Value;

use crate::types::{Implementation, InitializeParams, InitializeResult, MCP_VERSION};

/// Build the `initialize` result. Client params are only logged, so missing
/// or malformed params never fail the handshake.
pub fn negotiate(params: Option<&Value>, server_info: &Implementation) -> InitializeResult {
    let params: InitializeParams = params
        .and_then(|p| match serde_json::from_value(p.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!("Ignoring malformed initialize params: {e}");
                None
            }
        })
        .unwrap_or_default();

    match params.protocol_version.as_deref() {
        Some(version) if version != MCP_VERSION => tracing::warn!(
            "Client requested protocol version {version}, server supports {MCP_VERSION}. Proceeding with server version."
        ),
        _ => {}
    }

    match &params.client_info {
        Some(client) => tracing::info!("Initialized with client: {} v{}", client.name, client.version),
        None => tracing::info!("Initialized with unnamed client"),
    }

    InitializeResult::new(server_info.clone())
}
