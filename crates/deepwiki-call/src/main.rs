//! # Deepwiki Tool Caller
//!
//! Sends one tool call to the Deepwiki service and prints the raw response.
//!
//! ```bash
//! deepwiki-call read_wiki_structure octocat/hello-world
//! deepwiki-call ask_question octocat/hello-world --question "What is this for?"
//!
//! # Diagnostic logging goes to stderr
//! RUST_LOG=debug deepwiki-call read_wiki_contents octocat/hello-world
//! ```
//!
//! HTTP and network failures are printed to stdout and the process exits
//! normally. A missing `--question` for `ask_question` or an unknown tool
//! name aborts before anything is sent.

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use deepwiki_mcp_client::config::DEFAULT_TOOL_CALL_ENDPOINT;
use deepwiki_mcp_client::{ClientConfig, RequestPayload, ToolCaller, ToolName, run_tool_call};

#[derive(Parser, Debug)]
#[command(
    name = "deepwiki-call",
    about = "Deepwiki MCP client: call a Deepwiki tool for a GitHub repository"
)]
struct Args {
    /// Name of the MCP tool to call
    #[arg(value_enum)]
    tool_name: ToolName,

    /// GitHub repository in owner/repo format
    repo_name: String,

    /// Question for the 'ask_question' tool
    #[arg(long)]
    question: Option<String>,

    /// Tool-call endpoint
    #[arg(long, default_value = DEFAULT_TOOL_CALL_ENDPOINT)]
    url: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    debug!(?args, "Parsed arguments");

    let payload = RequestPayload::new(args.tool_name, args.repo_name, args.question)?;
    let caller = ToolCaller::new(&ClientConfig::default().with_tool_call_endpoint(args.url))?;

    run_tool_call(&caller, &payload, &mut std::io::stdout().lock())?;
    Ok(())
}
