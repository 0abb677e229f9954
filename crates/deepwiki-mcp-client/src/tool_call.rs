//! Blocking tool caller
//!
//! One POST of a [`RequestPayload`] to the tool-call endpoint, on the calling
//! thread. The response body is returned untouched; failures are classified
//! into [`CallError`] so the caller can print a diagnostic and carry on.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::io::Write;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{CallError, McpClientError, McpClientResult};
use crate::payload::RequestPayload;

/// Issues tool calls against the Deepwiki tool-call endpoint
#[derive(Debug, Clone)]
pub struct ToolCaller {
    client: Client,
    endpoint: Url,
}

impl ToolCaller {
    /// Create a caller for the configured tool-call endpoint
    pub fn new(config: &ClientConfig) -> McpClientResult<Self> {
        let endpoint = Url::parse(&config.tool_call_endpoint).map_err(|e| {
            McpClientError::config(format!(
                "Invalid URL {}: {}",
                config.tool_call_endpoint, e
            ))
        })?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| McpClientError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST the payload and return the response body verbatim
    pub fn call(&self, payload: &RequestPayload) -> Result<String, CallError> {
        info!(
            tool = %payload.tool(),
            repo = payload.repo_name(),
            endpoint = %self.endpoint,
            "Calling Deepwiki tool"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .map_err(CallError::from_reqwest)?;

        let status = response.status();
        let body = response.text().map_err(CallError::from_reqwest)?;

        check_status(status, body)
    }
}

/// Any status of 400 or above is a remote error, including codes past 599
fn check_status(status: StatusCode, body: String) -> Result<String, CallError> {
    if status.as_u16() >= 400 {
        warn!(status = status.as_u16(), "Tool call rejected by server");
        return Err(CallError::Status {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        });
    }

    debug!(status = status.as_u16(), bytes = body.len(), "Tool call completed");
    Ok(body)
}

/// Text printed for a call outcome: the body, or the diagnostic
pub fn render_outcome(outcome: &Result<String, CallError>) -> String {
    match outcome {
        Ok(body) => body.clone(),
        Err(e) => e.to_string(),
    }
}

/// Call the tool and print the outcome to `out`.
///
/// Network and protocol failures end up in `out`, never in the return value;
/// only a failing writer is reported back.
pub fn run_tool_call<W: Write>(
    caller: &ToolCaller,
    payload: &RequestPayload,
    out: &mut W,
) -> std::io::Result<()> {
    let outcome = caller.call(payload);
    if let Err(e) = &outcome {
        debug!(error = %e, "Tool call failed");
    }
    writeln!(out, "{}", render_outcome(&outcome))
}
