//! Handshake probe: connect, ping, list tools, print

use std::io::Write;
use tracing::debug;

use crate::client::McpClient;
use crate::error::McpClientResult;
use crate::protocol::Tool;

pub const CONNECTED_MESSAGE: &str = "Connected to Deepwiki MCP server.";

/// Run the probe against `client`, printing to `out`.
///
/// Every client failure is printed as a diagnostic. The session is closed
/// afterwards whatever happened, including a failing writer, whose error is
/// the only one returned.
pub async fn run_probe<W: Write>(client: &McpClient, out: &mut W) -> std::io::Result<()> {
    let report = report(client, out).await;
    client.close().await;
    report
}

async fn report<W: Write>(client: &McpClient, out: &mut W) -> std::io::Result<()> {
    let outcome = match connect_and_ping(client).await {
        Ok(()) => {
            writeln!(out, "{}", CONNECTED_MESSAGE)?;
            client.list_tools().await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(tools) => writeln!(out, "Available tools: {}", render_tools(&tools)),
        Err(e) => {
            debug!(error = ?e, "Probe failed");
            writeln!(out, "Failed to connect to Deepwiki MCP server: {}", e)
        }
    }
}

async fn connect_and_ping(client: &McpClient) -> McpClientResult<()> {
    client.connect().await?;
    client.ping().await
}

/// Tool list as the JSON array the server sent
pub fn render_tools(tools: &[Tool]) -> String {
    serde_json::to_string(tools).unwrap_or_else(|_| format!("{:?}", tools))
}
