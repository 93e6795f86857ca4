//! Stdio transport: reads JSON-RPC lines from stdin, writes responses to stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::watch;

use crate::protocol::ProtocolHandler;
use crate::types::{JsonRpcResponse, McpError, McpResult};

use super::framing::{self, ParseFailure};

/// Requests a running transport loop to stop before reading its next line.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Line-delimited transport for desktop MCP clients.
///
/// Messages are handled strictly one at a time, so responses leave in the
/// order their requests arrived.
pub struct StdioTransport {
    handler: ProtocolHandler,
    stop_tx: Arc<watch::Sender<bool>>,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            handler,
            stop_tx: Arc::new(stop_tx),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: Arc::clone(&self.stop_tx),
        }
    }

    /// Run the transport loop on stdin and stdout.
    pub async fn run(&self) -> McpResult<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.run_with(reader, writer).await
    }

    /// Run the transport loop until EOF, a stop request, or an I/O failure.
    ///
    /// Read and write errors end the loop and are returned to the caller. A
    /// line that is not valid JSON, or not even UTF-8, is handled per line.
    pub async fn run_with<R, W>(&self, mut reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut stop = self.stop_tx.subscribe();
        let mut line = Vec::new();

        tracing::info!("Stdio transport started");

        loop {
            line.clear();
            let bytes_read = tokio::select! {
                biased;
                _ = stopped(&mut stop) => {
                    tracing::info!("Stop requested, shutting down");
                    break;
                }
                read = reader.read_until(b'\n', &mut line) => read.map_err(McpError::Io)?,
            };

            if bytes_read == 0 {
                tracing::info!("EOF on input, shutting down");
                break;
            }

            let trimmed = framing::trim(&line);
            if trimmed.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(trimmed).await {
                write_response(&mut writer, &response).await?;
            }
        }

        Ok(())
    }

    async fn handle_line(&self, line: &[u8]) -> Option<JsonRpcResponse> {
        let request = match framing::parse_line(line) {
            Ok(request) => request,
            Err(ParseFailure { id: Some(id), error }) => {
                tracing::warn!("Parse error in request {id}: {error}");
                return Some(error.to_response(Some(id)));
            }
            Err(ParseFailure { id: None, error }) => {
                tracing::debug!("Dropping unanswerable line: {error}");
                return None;
            }
        };

        let is_notification = request.is_notification();
        let method = request.method.clone();
        let response = self.handler.handle_request(request).await;

        if is_notification {
            if response.is_some() {
                tracing::debug!("Suppressed response to notification {method}");
            }
            return None;
        }
        response
    }
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> McpResult<()>
where
    W: AsyncWrite + Unpin,
{
    let framed = framing::frame_response(response)?;
    writer
        .write_all(framed.as_bytes())
        .await
        .map_err(McpError::Io)?;
    writer.flush().await.map_err(McpError::Io)?;
    Ok(())
}

/// Resolves once a stop has been requested.
async fn stopped(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
