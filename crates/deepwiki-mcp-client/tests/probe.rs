//! Handshake probe against a simulated MCP server

mod common;

use common::{
    MockResponse, MockServer, RecordedRequest, empty_response, json_response, sse_response,
    text_response, unreachable_url,
};
use deepwiki_mcp_client::probe::CONNECTED_MESSAGE;
use deepwiki_mcp_client::{ClientConfig, McpClient, McpClientBuilder, run_probe};
use hyper::{Response, StatusCode};
use serde_json::{Value, json};

const SESSION_ID: &str = "session-7f3a";

fn client_for(url: String) -> McpClient {
    McpClientBuilder::new()
        .with_config(
            ClientConfig::default()
                .with_mcp_endpoint(url)
                .with_client_info("deepwiki-probe", "0.1.0"),
        )
        .build()
        .unwrap()
}

async fn probe(client: &McpClient) -> String {
    let mut out = Vec::new();
    run_probe(client, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

fn result_for(request: &RecordedRequest, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": request.json()["id"], "result": result})
}

fn initialize_response(request: &RecordedRequest) -> MockResponse {
    let body = result_for(
        request,
        json!({
            "protocolVersion": "2025-06-18",
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": "DeepWiki", "version": "0.0.1"}
        }),
    );
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/json")
        .header("mcp-session-id", SESSION_ID)
        .body(http_body_util::Full::new(bytes::Bytes::from(body.to_string())))
        .unwrap()
}

fn tool(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{} tool", name),
        "inputSchema": {"type": "object", "properties": {"repoName": {"type": "string"}}}
    })
}

/// A well-behaved server: SSE for ping, two pages of tools
fn deepwiki_server(request: &RecordedRequest) -> MockResponse {
    match request.rpc_method().as_str() {
        "initialize" => initialize_response(request),
        "notifications/initialized" => empty_response(StatusCode::ACCEPTED),
        "ping" => sse_response(&[
            json!({"jsonrpc": "2.0", "method": "notifications/message", "params": {"level": "info"}}),
            result_for(request, json!({})),
        ]),
        "tools/list" => {
            let page = match request.json()["params"]["cursor"].as_str() {
                None => json!({
                    "tools": [tool("read_wiki_structure"), tool("read_wiki_contents")],
                    "nextCursor": "page-2"
                }),
                Some(_) => json!({"tools": [tool("ask_question")]}),
            };
            json_response(result_for(request, page))
        }
        "DELETE" => empty_response(StatusCode::OK),
        _ => empty_response(StatusCode::BAD_REQUEST),
    }
}

#[tokio::test]
async fn test_probe_prints_connection_and_tools() {
    let server = MockServer::start(deepwiki_server).await;
    let client = client_for(server.url("/mcp"));

    let printed = probe(&client).await;
    let lines: Vec<&str> = printed.lines().collect();

    assert_eq!(lines.len(), 2, "got: {}", printed);
    assert_eq!(lines[0], CONNECTED_MESSAGE);

    let tools = lines[1]
        .strip_prefix("Available tools: ")
        .expect("tool list line");
    let tools: Value = serde_json::from_str(tools).unwrap();
    let names: Vec<&str> = tools
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["read_wiki_structure", "read_wiki_contents", "ask_question"]
    );
    assert_eq!(tools[2]["inputSchema"]["properties"]["repoName"]["type"], "string");
}

#[tokio::test]
async fn test_probe_follows_session_protocol() {
    let server = MockServer::start(deepwiki_server).await;
    let client = client_for(server.url("/mcp"));

    probe(&client).await;

    let requests = server.requests();
    let methods: Vec<String> = requests.iter().map(|r| r.rpc_method()).collect();
    assert_eq!(
        methods,
        vec![
            "initialize",
            "notifications/initialized",
            "ping",
            "tools/list",
            "tools/list",
            "DELETE"
        ]
    );

    let initialize = &requests[0];
    assert_eq!(initialize.header("mcp-session-id"), None);
    assert_eq!(
        initialize.header("accept"),
        Some("application/json, text/event-stream")
    );
    assert_eq!(initialize.json()["params"]["clientInfo"]["name"], "deepwiki-probe");

    for request in &requests[1..] {
        assert_eq!(request.header("mcp-session-id"), Some(SESSION_ID));
    }
    assert_eq!(requests[2].header("mcp-protocol-version"), Some("2025-06-18"));

    // Session is closed afterwards
    assert!(!client.is_ready().await);
}

#[tokio::test]
async fn test_tool_list_failure_is_printed_and_session_closed() {
    let server = MockServer::start(|request| match request.rpc_method().as_str() {
        "tools/list" => json_response(json!({
            "jsonrpc": "2.0",
            "id": request.json()["id"],
            "error": {"code": -32601, "message": "Method not found"}
        })),
        _ => deepwiki_server(request),
    })
    .await;
    let client = client_for(server.url("/mcp"));

    let printed = probe(&client).await;
    let lines: Vec<&str> = printed.lines().collect();

    assert_eq!(lines[0], CONNECTED_MESSAGE);
    assert_eq!(
        lines[1],
        "Failed to connect to Deepwiki MCP server: Server error (code -32601): Method not found"
    );

    let last = server.requests().pop().unwrap();
    assert_eq!(last.method, "DELETE");
    assert_eq!(last.header("mcp-session-id"), Some(SESSION_ID));
}

#[tokio::test]
async fn test_handshake_failure_is_printed() {
    let server = MockServer::start(|request| match request.rpc_method().as_str() {
        "initialize" => text_response(StatusCode::SERVICE_UNAVAILABLE, "maintenance"),
        _ => deepwiki_server(request),
    })
    .await;
    let client = client_for(server.url("/mcp"));

    let printed = probe(&client).await;

    assert!(
        printed.starts_with("Failed to connect to Deepwiki MCP server: "),
        "got: {}",
        printed
    );
    assert!(printed.contains("503"));
    assert!(printed.contains("maintenance"));
    assert!(!printed.contains(CONNECTED_MESSAGE));

    // No session was issued, so nothing to delete
    let methods: Vec<String> = server.requests().iter().map(|r| r.rpc_method()).collect();
    assert_eq!(methods, vec!["initialize"]);
}

#[tokio::test]
async fn test_unreachable_server_is_printed() {
    let client = client_for(unreachable_url("/mcp").await);

    let printed = probe(&client).await;

    assert!(
        printed.starts_with("Failed to connect to Deepwiki MCP server: Transport error"),
        "got: {}",
        printed
    );
    assert_eq!(printed.lines().count(), 1);
}

#[tokio::test]
async fn test_stateless_server_without_session_id() {
    let server = MockServer::start(|request| match request.rpc_method().as_str() {
        "initialize" => json_response(result_for(
            request,
            json!({
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "serverInfo": {"name": "stateless", "version": "1.0.0"}
            }),
        )),
        _ => deepwiki_server(request),
    })
    .await;
    let client = client_for(server.url("/mcp"));

    client.connect().await.unwrap();
    assert!(client.is_ready().await);
    assert_eq!(client.server_info().unwrap().server_info.name, "stateless");
    client.ping().await.unwrap();
    client.close().await;

    let requests = server.requests();
    assert!(requests.iter().all(|r| r.header("mcp-session-id").is_none()));
    assert_eq!(
        requests.last().unwrap().header("mcp-protocol-version"),
        Some("2025-03-26")
    );
    assert!(requests.iter().all(|r| r.method == "POST"));
}

#[tokio::test]
async fn test_cycling_cursors_end_pagination() {
    let server = MockServer::start(|request| match request.rpc_method().as_str() {
        "tools/list" => {
            let (name, next) = match request.json()["params"]["cursor"].as_str() {
                None => ("read_wiki_structure", "a"),
                Some("a") => ("read_wiki_contents", "b"),
                Some(_) => ("ask_question", "a"),
            };
            json_response(result_for(
                request,
                json!({"tools": [tool(name)], "nextCursor": next}),
            ))
        }
        _ => deepwiki_server(request),
    })
    .await;
    let client = client_for(server.url("/mcp"));

    let printed = tokio::time::timeout(std::time::Duration::from_secs(5), probe(&client))
        .await
        .expect("pagination should stop on a revisited cursor");

    assert!(printed.starts_with(CONNECTED_MESSAGE), "got: {}", printed);
    let list_calls = server
        .requests()
        .iter()
        .filter(|r| r.rpc_method() == "tools/list")
        .count();
    assert_eq!(list_calls, 3);

    let last = server.requests().pop().unwrap();
    assert_eq!(last.method, "DELETE");
}
