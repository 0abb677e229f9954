//! MCP session client

use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{McpClientError, McpClientResult, ProtocolError};
use crate::protocol::{
    InitializeRequest, InitializeResult, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, Tool, methods,
};
use crate::transport::{BoxedTransport, ConnectionInfo, HttpTransport};

/// Client for one MCP session
///
/// Operations run one at a time; the transport sits behind an async mutex so
/// the API can take `&self`.
pub struct McpClient {
    /// Transport layer
    transport: tokio::sync::Mutex<BoxedTransport>,
    /// Configuration
    config: ClientConfig,
    /// Result of the `initialize` handshake
    server: parking_lot::Mutex<Option<InitializeResult>>,
    /// Request ID counter
    request_counter: AtomicU64,
}

impl McpClient {
    /// Create a new MCP client with the given transport
    pub fn new(transport: BoxedTransport, config: ClientConfig) -> Self {
        Self {
            transport: tokio::sync::Mutex::new(transport),
            config,
            server: parking_lot::Mutex::new(None),
            request_counter: AtomicU64::new(0),
        }
    }

    /// Open the session: `initialize`, then `notifications/initialized`
    pub async fn connect(&self) -> McpClientResult<()> {
        info!("Connecting to MCP server");

        self.transport.lock().await.connect().await?;

        let init_request = InitializeRequest::new(
            self.config.protocol_version.clone(),
            self.config.client_info.clone(),
        );
        let result = self
            .request(methods::INITIALIZE, serde_json::to_value(&init_request)?)
            .await?;
        let init_result: InitializeResult = serde_json::from_value(result)?;

        {
            let mut transport = self.transport.lock().await;
            transport.set_protocol_version(init_result.protocol_version.clone());
            transport
                .send_notification(JsonRpcNotification::new(methods::INITIALIZED))
                .await?;
        }

        info!(
            server = %init_result.server_info.name,
            version = %init_result.server_info.version,
            protocol = %init_result.protocol_version,
            "MCP session initialized"
        );
        *self.server.lock() = Some(init_result);
        Ok(())
    }

    /// Close the session.
    ///
    /// Sends the session DELETE when the server issued a session id. Never
    /// fails: problems are logged, and the transport ends up disconnected.
    pub async fn close(&self) {
        let mut transport = self.transport.lock().await;

        if let Err(e) = transport.send_delete().await {
            warn!(error = %e, "Failed to terminate session - continuing with cleanup");
        }
        if let Err(e) = transport.disconnect().await {
            warn!(error = %e, "Failed to disconnect transport");
        }
        *self.server.lock() = None;

        debug!("MCP session closed");
    }

    /// Check if the handshake completed and the transport is up
    pub async fn is_ready(&self) -> bool {
        let initialized = self.server.lock().is_some();
        initialized && self.transport.lock().await.is_connected()
    }

    /// Server identity and capabilities from `initialize`
    pub fn server_info(&self) -> Option<InitializeResult> {
        self.server.lock().clone()
    }

    /// Get connection information
    pub async fn connection_info(&self) -> ConnectionInfo {
        self.transport.lock().await.connection_info()
    }

    /// Send a ping to test liveness
    pub async fn ping(&self) -> McpClientResult<()> {
        debug!("Sending ping");
        self.request(methods::PING, json!({})).await?;
        debug!("Ping successful");
        Ok(())
    }

    /// List every tool the server offers, following pagination cursors
    pub async fn list_tools(&self) -> McpClientResult<Vec<Tool>> {
        debug!("Listing tools");

        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen: HashSet<String> = HashSet::new();

        loop {
            let params = match &cursor {
                Some(cursor) => json!({ "cursor": cursor }),
                None => json!({}),
            };
            let page: ListToolsResult =
                serde_json::from_value(self.request(methods::TOOLS_LIST, params).await?)?;
            tools.extend(page.tools);

            match page.next_cursor {
                Some(next) if seen.insert(next.clone()) => cursor = Some(next),
                Some(next) => {
                    warn!(cursor = %next, "Server revisited pagination cursor, stopping");
                    break;
                }
                None => break,
            }
        }

        debug!(count = tools.len(), "Retrieved tools");
        Ok(tools)
    }

    /// Generate next request ID
    fn next_request_id(&self) -> String {
        let counter = self.request_counter.fetch_add(1, Ordering::SeqCst);
        format!("req_{}", counter)
    }

    /// Send a request and unwrap its `result`
    async fn request(&self, method: &'static str, params: Value) -> McpClientResult<Value> {
        let id = self.next_request_id();
        let request = JsonRpcRequest::new(id.clone(), method, params);

        let message = self.transport.lock().await.send_request(request).await?;
        let response: JsonRpcResponse = serde_json::from_value(message)?;

        if let Some(error) = response.error {
            return Err(McpClientError::server_error(
                error.code,
                error.message,
                error.data,
            ));
        }

        response.result.ok_or_else(|| {
            ProtocolError::InvalidResponse(format!("response to {} has no result", id)).into()
        })
    }
}

/// Builder for creating MCP clients
#[derive(Default)]
pub struct McpClientBuilder {
    transport: Option<BoxedTransport>,
    config: Option<ClientConfig>,
}

impl McpClientBuilder {
    /// Create a new client builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set transport
    pub fn with_transport(mut self, transport: BoxedTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set configuration
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the client; without an explicit transport, an
    /// [`HttpTransport`] to the configured MCP endpoint is used.
    pub fn build(self) -> McpClientResult<McpClient> {
        let config = self.config.unwrap_or_default();
        let transport = match self.transport {
            Some(transport) => transport,
            None => Box::new(HttpTransport::new(&config.mcp_endpoint)?),
        };

        Ok(McpClient::new(transport, config))
    }
}
