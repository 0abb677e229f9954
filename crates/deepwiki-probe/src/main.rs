//! # Deepwiki Handshake Probe
//!
//! Opens an MCP session with the Deepwiki server, pings it and prints the
//! tools it offers. Any failure is printed as a diagnostic; the session is
//! closed on every path.
//!
//! ```bash
//! deepwiki-probe
//! RUST_LOG=debug deepwiki-probe --url http://127.0.0.1:8080/mcp
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use deepwiki_mcp_client::config::DEFAULT_MCP_ENDPOINT;
use deepwiki_mcp_client::{ClientConfig, McpClientBuilder, run_probe};

#[derive(Parser, Debug)]
#[command(
    name = "deepwiki-probe",
    about = "Check that the Deepwiki MCP server answers and list its tools"
)]
struct Args {
    /// MCP server URL
    #[arg(short, long, default_value = DEFAULT_MCP_ENDPOINT)]
    url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig::default()
        .with_mcp_endpoint(&args.url)
        .with_client_info("deepwiki-probe", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout().lock();
    match McpClientBuilder::new().with_config(config).build() {
        Ok(client) => run_probe(&client, &mut stdout).await?,
        Err(e) => {
            use std::io::Write;
            writeln!(stdout, "Failed to connect to Deepwiki MCP server: {}", e)?;
        }
    }

    Ok(())
}
