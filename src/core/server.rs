//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tools domain.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool,
//! each implementing `UpstreamTool`. The STDIO transport dispatches through
//! the ToolRouter built in `domains/tools/router.rs`; the HTTP transport
//! dispatches through a fresh `ToolRegistry` per request.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::debug;

use super::config::Config;
use super::upstream::UpstreamClient;
use crate::domains::tools::{ToolContext, ToolRegistry, build_tool_router};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. It is cheap to
/// clone: the configuration and the HTTP connection pool are shared.
#[derive(Clone)]
pub struct McpServer {
    /// Configuration and HTTP client handed to every tool call.
    ctx: ToolContext,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = UpstreamClient::new()?;
        Ok(Self::with_client(config, client))
    }

    /// Create a server that issues upstream calls through `client`.
    pub fn with_client(config: Config, client: UpstreamClient) -> Self {
        let ctx = ToolContext::new(Arc::new(config), client);
        Self {
            tool_router: build_tool_router::<Self>(ctx.clone()),
            ctx,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.ctx.config().server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.ctx.config().server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Config {
        self.ctx.config()
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        ToolRegistry::get_all_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// A registry is built for this call only, so concurrent requests share
    /// nothing but the configuration and the connection pool.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, String> {
        debug!("Dispatching {} through a request-scoped registry", name);
        let registry = ToolRegistry::new(self.ctx.clone());
        registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Tools for the Shopify admin API (products, orders, abandoned checkouts, customers) and the Dropi logistics API (login, orders, status updates). Credentials are passed with each call. Every result carries an envelope: {ok: true, payload} or {ok: false, kind, message, ...}."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
