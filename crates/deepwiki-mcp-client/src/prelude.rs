//! # Deepwiki Client Prelude
//!
//! ```rust
//! use deepwiki_mcp_client::prelude::*;
//! ```

// Core client types
pub use crate::client::{McpClient, McpClientBuilder};
pub use crate::config::ClientConfig;
pub use crate::error::{CallError, McpClientError, McpClientResult, ValidationError};
pub use crate::payload::{RequestPayload, ToolName};
pub use crate::probe::run_probe;
pub use crate::tool_call::{ToolCaller, run_tool_call};

// Protocol types
pub use crate::protocol::{Implementation, InitializeResult, Tool};

// Transport types
pub use crate::transport::{HttpTransport, Transport};
