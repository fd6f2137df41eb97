//! Commerce MCP server entry point.
//!
//! Loads configuration, sets up logging on stderr and serves the Shopify and
//! Dropi tools over the configured transport.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use commerce_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        "Upstream deadlines: {} ms short, {} ms long",
        config.upstream.timeouts.short_ms, config.upstream.timeouts.long_ms
    );

    let server =
        McpServer::new(config.clone()).context("failed to initialize the MCP server")?;

    TransportService::new(config.transport)
        .run(server)
        .await
        .context("transport stopped with an error")?;

    info!("Server shutting down");
    Ok(())
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `MCP_LOG_LEVEL` applies to the whole
/// process. Output goes to stderr because stdout carries the STDIO protocol.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();
}
