//! Streamable HTTP transport for the MCP session client
//!
//! Every message is a POST to the endpoint. A request's answer arrives either
//! as a plain JSON body or as a `text/event-stream` body whose `data:` frames
//! carry JSON-RPC messages; the body is read whole and the frame answering
//! the request is picked out.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{McpClientResult, ProtocolError, TransportError};
use crate::protocol::{JsonRpcNotification, JsonRpcRequest, is_response_to};
use crate::transport::{ConnectionInfo, Transport, parse_endpoint};

const SESSION_HEADER: &str = "mcp-session-id";
const PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";
const ACCEPT_STREAMABLE: &str = "application/json, text/event-stream";

/// HTTP transport for the MCP session client (Streamable HTTP)
#[derive(Debug)]
pub struct HttpTransport {
    /// HTTP client
    client: Client,
    /// Server endpoint URL
    endpoint: Url,
    /// Connection state
    connected: bool,
    /// Session ID from server (set during initialization)
    session_id: Arc<parking_lot::Mutex<Option<String>>>,
    /// Negotiated protocol revision
    protocol_version: Option<String>,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(endpoint: &str) -> McpClientResult<Self> {
        let client = Client::builder()
            .user_agent(format!("deepwiki-mcp-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                TransportError::ConnectionFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Self::with_client(endpoint, client)
    }

    /// Create HTTP transport with custom client
    pub fn with_client(endpoint: &str, client: Client) -> McpClientResult<Self> {
        Ok(Self {
            client,
            endpoint: parse_endpoint(endpoint)?,
            connected: false,
            session_id: Arc::new(parking_lot::Mutex::new(None)),
            protocol_version: None,
        })
    }

    /// POST builder carrying the session headers
    fn post(&self) -> RequestBuilder {
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ACCEPT_STREAMABLE);

        if let Some(version) = &self.protocol_version {
            builder = builder.header(PROTOCOL_VERSION_HEADER, version);
        }
        if let Some(session_id) = self.session_id.lock().as_deref() {
            builder = builder.header(SESSION_HEADER, session_id);
        }
        builder
    }

    fn ensure_connected(&self) -> McpClientResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(TransportError::NotConnected.into())
        }
    }

    /// Fail on error statuses, remember any session id the server issued
    async fn check_response(&self, response: Response) -> McpClientResult<Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        if let Some(header) = response.headers().get(SESSION_HEADER)
            && let Ok(session_id) = header.to_str()
        {
            let mut current = self.session_id.lock();
            if current.as_deref() != Some(session_id) {
                debug!(session_id, "Captured session ID from response");
                *current = Some(session_id.to_owned());
            }
        }

        Ok(response)
    }
}

/// Pick the answer to request `id` out of a response body
pub fn decode_response_body(content_type: &str, body: &str, id: &str) -> McpClientResult<Value> {
    let media_type = content_type.split(';').next().unwrap_or("").trim();

    if media_type.eq_ignore_ascii_case("application/json") {
        let message: Value = serde_json::from_str(body)?;
        let found = match message {
            Value::Array(batch) => batch.into_iter().find(|m| is_response_to(m, id)),
            single if is_response_to(&single, id) => Some(single),
            other => {
                return Err(ProtocolError::InvalidResponse(format!(
                    "expected response to {}, got {}",
                    id, other
                ))
                .into());
            }
        };
        found.ok_or_else(|| ProtocolError::MissingResponse(id.to_string()).into())
    } else if media_type.eq_ignore_ascii_case("text/event-stream") {
        sse_data_frames(body)
            .into_iter()
            .filter_map(|data| serde_json::from_str::<Value>(&data).ok())
            .find(|message| {
                let answers = is_response_to(message, id);
                if !answers {
                    debug!(message = %message, "Skipping event stream frame");
                }
                answers
            })
            .ok_or_else(|| ProtocolError::MissingResponse(id.to_string()).into())
    } else {
        Err(TransportError::UnsupportedContentType(content_type.to_string()).into())
    }
}

/// Data payloads of the events in an event-stream body.
///
/// Multi-line `data:` fields of one event are joined with newlines; events
/// are separated by blank lines.
pub fn sse_data_frames(body: &str) -> Vec<String> {
    let mut frames = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in body.lines() {
        if line.is_empty() {
            if !current.is_empty() {
                frames.push(current.join("\n"));
                current.clear();
            }
        } else if let Some(data) = line.strip_prefix("data:") {
            current.push(data.strip_prefix(' ').unwrap_or(data));
        }
    }
    if !current.is_empty() {
        frames.push(current.join("\n"));
    }

    frames
}

#[async_trait]
impl Transport for HttpTransport {
    async fn connect(&mut self) -> McpClientResult<()> {
        // Streamable HTTP has no connection step; the initialize request is
        // the first contact with the server.
        self.connected = true;
        debug!(endpoint = %self.endpoint, "HTTP transport ready");
        Ok(())
    }

    async fn disconnect(&mut self) -> McpClientResult<()> {
        self.connected = false;
        *self.session_id.lock() = None;
        debug!(endpoint = %self.endpoint, "HTTP transport disconnected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send_request(&mut self, request: JsonRpcRequest) -> McpClientResult<Value> {
        self.ensure_connected()?;

        debug!(method = request.method, id = %request.id, "Sending HTTP request");

        let response = self.post().json(&request).send().await?;
        let response = self.check_response(response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = response.text().await?;

        decode_response_body(&content_type, &body, &request.id)
    }

    async fn send_notification(
        &mut self,
        notification: JsonRpcNotification,
    ) -> McpClientResult<()> {
        self.ensure_connected()?;

        debug!(method = notification.method, "Sending HTTP notification");

        let response = self.post().json(&notification).send().await?;
        self.check_response(response).await?;
        Ok(())
    }

    async fn send_delete(&mut self) -> McpClientResult<()> {
        let Some(session_id) = self.session_id.lock().clone() else {
            debug!("No session ID available, skipping DELETE request");
            return Ok(());
        };

        let response = self
            .client
            .delete(self.endpoint.clone())
            .header(SESSION_HEADER, &session_id)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                info!(session_id = %session_id, "Session terminated");
                Ok(())
            }
            StatusCode::METHOD_NOT_ALLOWED => {
                debug!(session_id = %session_id, "Server does not support session termination");
                Ok(())
            }
            status => {
                warn!(session_id = %session_id, status = status.as_u16(), "Session DELETE rejected");
                Err(TransportError::Status {
                    status: status.as_u16(),
                    body: response.text().await.unwrap_or_default(),
                }
                .into())
            }
        }
    }

    fn session_id(&self) -> Option<String> {
        self.session_id.lock().clone()
    }

    fn set_protocol_version(&mut self, version: String) {
        self.protocol_version = Some(version);
    }

    fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            endpoint: self.endpoint.to_string(),
            connected: self.connected,
            session_id: self.session_id(),
        }
    }
}
