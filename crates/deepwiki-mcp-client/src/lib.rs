//! # Deepwiki MCP Client Library
//!
//! Client support for the Deepwiki repository-documentation service:
//!
//! - **Tool calls**: a blocking POST of a JSON payload naming one of three
//!   tools (`read_wiki_structure`, `read_wiki_contents`, `ask_question`) and a
//!   repository, with the response printed verbatim.
//! - **Handshake probe**: an MCP session over streamable HTTP that pings the
//!   server and lists its tools.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deepwiki_mcp_client::{ClientConfig, RequestPayload, ToolCaller, ToolName};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let payload = RequestPayload::new(
//!         ToolName::AskQuestion,
//!         "octocat/hello-world",
//!         Some("What is this repository for?".to_string()),
//!     )?;
//!
//!     let caller = ToolCaller::new(&ClientConfig::default())?;
//!     match caller.call(&payload) {
//!         Ok(body) => println!("{}", body),
//!         Err(e) => println!("{}", e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ```rust,no_run
//! use deepwiki_mcp_client::McpClientBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = McpClientBuilder::new().build()?;
//!
//!     client.connect().await?;
//!     client.ping().await?;
//!     let tools = client.list_tools().await?;
//!     println!("Available tools: {:?}", tools);
//!     client.close().await;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod prelude;
pub mod probe;
pub mod protocol;
pub mod tool_call;
pub mod transport;

// Re-export main types
pub use client::{McpClient, McpClientBuilder};
pub use config::ClientConfig;
pub use error::{CallError, McpClientError, McpClientResult, ValidationError};
pub use payload::{RequestPayload, ToolName};
pub use probe::run_probe;
pub use tool_call::{ToolCaller, run_tool_call};

// Re-export transport types
pub use transport::{HttpTransport, Transport};
