//! Error types for Deepwiki client operations

use serde_json::Value;
use thiserror::Error;

/// Result type for MCP session operations
pub type McpClientResult<T> = Result<T, McpClientError>;

/// Local validation failures, raised before any network I/O
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `ask_question` was requested without a question
    #[error("Question is required for 'ask_question' tool.")]
    MissingQuestion,

    /// Tool name outside the supported set
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Failure of a single blocking tool call
///
/// Each variant renders as the diagnostic printed by the caller binary.
#[derive(Error, Debug)]
pub enum CallError {
    /// Server answered with a status >= 400
    #[error("HTTP Error: {code} - {reason}\n{body}")]
    Status {
        code: u16,
        reason: String,
        body: String,
    },

    /// Connection, DNS or TLS failure
    #[error("URL Error: {0}")]
    Transport(String),

    /// Anything else
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl CallError {
    /// Classify a `reqwest` failure into transport or unexpected errors
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Self::Transport(error_chain(&err))
        } else {
            Self::Unexpected(error_chain(&err))
        }
    }

    /// HTTP status code, if the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Comprehensive error type for MCP session operations
#[derive(Error, Debug)]
pub enum McpClientError {
    /// Transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Protocol-level errors
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned a JSON-RPC error
    #[error("Server error (code {code}): {message}")]
    ServerError {
        code: i32,
        message: String,
        data: Option<Value>,
    },
}

/// Transport-specific errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Not connected")]
    NotConnected,
}

/// Protocol-specific errors
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON-RPC response: {0}")]
    InvalidResponse(String),

    #[error("No response for request {0} in event stream")]
    MissingResponse(String),
}

impl McpClientError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a server error from JSON-RPC error response
    pub fn server_error(code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::ServerError {
            code,
            message: message.into(),
            data,
        }
    }

    /// Get the error code if this is a server error
    pub fn error_code(&self) -> Option<i32> {
        match self {
            Self::ServerError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::ConnectionFailed(error_chain(&err))
    }
}

impl From<reqwest::Error> for McpClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.into())
    }
}

/// Join an error with its sources; `reqwest` keeps the useful reason
/// (refused, DNS, TLS) in the source chain.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
