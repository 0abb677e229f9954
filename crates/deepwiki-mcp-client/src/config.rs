//! Configuration types for Deepwiki clients

use serde::{Deserialize, Serialize};

use crate::error::{McpClientError, McpClientResult};
use crate::protocol::Implementation;

/// Endpoint of the plain JSON tool-call service
pub const DEFAULT_TOOL_CALL_ENDPOINT: &str = "https://mcp.deepwiki.com/sse";

/// Endpoint of the MCP streamable HTTP service
pub const DEFAULT_MCP_ENDPOINT: &str = "https://mcp.deepwiki.com/mcp";

/// MCP protocol revision sent during `initialize`
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// URL the blocking tool caller POSTs to
    pub tool_call_endpoint: String,

    /// URL of the MCP session endpoint
    pub mcp_endpoint: String,

    /// Client identification sent during `initialize`
    pub client_info: Implementation,

    /// Protocol revision requested during `initialize`
    pub protocol_version: String,

    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tool_call_endpoint: DEFAULT_TOOL_CALL_ENDPOINT.to_string(),
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            client_info: Implementation::new("deepwiki-mcp-client", env!("CARGO_PKG_VERSION")),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            user_agent: format!("deepwiki-mcp-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Override the tool-call endpoint
    pub fn with_tool_call_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.tool_call_endpoint = endpoint.into();
        self
    }

    /// Override the MCP endpoint
    pub fn with_mcp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.mcp_endpoint = endpoint.into();
        self
    }

    /// Override the client identity
    pub fn with_client_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.client_info = Implementation::new(name, version);
        self
    }

    /// Check that both endpoints are http(s) URLs
    pub fn validate(&self) -> McpClientResult<()> {
        for endpoint in [&self.tool_call_endpoint, &self.mcp_endpoint] {
            let url = url::Url::parse(endpoint)
                .map_err(|e| McpClientError::config(format!("Invalid URL {}: {}", endpoint, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(McpClientError::config(format!(
                    "Unsupported scheme for {}: {}",
                    endpoint,
                    url.scheme()
                )));
            }
        }
        Ok(())
    }
}
