//! In-process HTTP server standing in for the Deepwiki service

#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    /// JSON-RPC method of the body, or the HTTP method for bodiless requests
    pub fn rpc_method(&self) -> String {
        self.json()
            .get("method")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.method.clone())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

pub type MockResponse = Response<Full<Bytes>>;

pub struct MockServer {
    addr: std::net::SocketAddr,
    requests: Arc<parking_lot::Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    /// Serve `handler` on an ephemeral port until the test runtime stops
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let log = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = handler.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let handler = handler.clone();
                        let log = log.clone();
                        async move {
                            let (parts, body) = req.into_parts();
                            let bytes = body.collect().await?.to_bytes();
                            let recorded = RecordedRequest {
                                method: parts.method.to_string(),
                                headers: parts
                                    .headers
                                    .iter()
                                    .filter_map(|(name, value)| {
                                        Some((name.to_string(), value.to_str().ok()?.to_string()))
                                    })
                                    .collect(),
                                body: String::from_utf8_lossy(&bytes).into_owned(),
                            };
                            let response = (*handler)(&recorded);
                            log.lock().push(recorded);
                            Ok::<_, hyper::Error>(response)
                        }
                    });

                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

pub fn text_response(status: StatusCode, body: &str) -> MockResponse {
    Response::builder()
        .status(status)
        .header("content-type", "text/plain")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

pub fn json_response(body: Value) -> MockResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

pub fn sse_response(messages: &[Value]) -> MockResponse {
    let body: String = messages
        .iter()
        .map(|m| format!("event: message\ndata: {}\n\n", m))
        .collect();
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/event-stream")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

pub fn empty_response(status: StatusCode) -> MockResponse {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Address nobody listens on
pub async fn unreachable_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, path)
}
