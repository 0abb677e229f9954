//! Transport layer for the MCP session client

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::{McpClientResult, TransportError};
use crate::protocol::{JsonRpcNotification, JsonRpcRequest};

pub mod http;

pub use http::HttpTransport;

/// Transport connection information
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// Connection endpoint
    pub endpoint: String,
    /// Connection state
    pub connected: bool,
    /// Session issued by the server, if any
    pub session_id: Option<String>,
}

/// Interface between [`McpClient`](crate::McpClient) and the wire
#[async_trait]
pub trait Transport: Send + Sync {
    /// Prepare the transport for requests
    async fn connect(&mut self) -> McpClientResult<()>;

    /// Release the transport; further requests fail
    async fn disconnect(&mut self) -> McpClientResult<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send a request and return the matching JSON-RPC response message
    async fn send_request(&mut self, request: JsonRpcRequest) -> McpClientResult<Value>;

    /// Send a notification (no response expected)
    async fn send_notification(&mut self, notification: JsonRpcNotification)
    -> McpClientResult<()>;

    /// Ask the server to end the current session
    async fn send_delete(&mut self) -> McpClientResult<()>;

    /// Session id issued by the server, if any
    fn session_id(&self) -> Option<String>;

    /// Protocol revision to announce on every request after `initialize`
    fn set_protocol_version(&mut self, version: String);

    /// Get connection information
    fn connection_info(&self) -> ConnectionInfo;
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn Transport>;

/// Parse and check an endpoint URL for HTTP transports
pub fn parse_endpoint(endpoint: &str) -> McpClientResult<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| TransportError::ConnectionFailed(format!("Invalid URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::ConnectionFailed(format!(
            "Invalid scheme for HTTP transport: {}",
            url.scheme()
        ))
        .into());
    }

    Ok(url)
}
