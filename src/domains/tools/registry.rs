//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - Name-based dispatch for tool calls (used by the HTTP transport)
//! - Tool metadata for listing

use rmcp::model::{CallToolResult, Tool};
use tracing::warn;

use super::definitions::{
    AbandonedCartsTool, CreateOrderTool, CustomerByIdTool, DropiLoginTool, DropiOrdersTool,
    ListProductsTool, SearchProductsTool, UpdateOrderTool,
};
use super::handlers::{ToolContext, UpstreamTool, run_tool, to_tool};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Holds no per-call state; the HTTP transport builds one per request.
pub struct ToolRegistry {
    ctx: ToolContext,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            ListProductsTool::NAME,
            SearchProductsTool::NAME,
            CreateOrderTool::NAME,
            AbandonedCartsTool::NAME,
            CustomerByIdTool::NAME,
            DropiLoginTool::NAME,
            DropiOrdersTool::NAME,
            UpdateOrderTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Both transports list tools from here.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            to_tool::<ListProductsTool>(),
            to_tool::<SearchProductsTool>(),
            to_tool::<CreateOrderTool>(),
            to_tool::<AbandonedCartsTool>(),
            to_tool::<CustomerByIdTool>(),
            to_tool::<DropiLoginTool>(),
            to_tool::<DropiOrdersTool>(),
            to_tool::<UpdateOrderTool>(),
        ]
    }

    /// Dispatch a tool call by name.
    ///
    /// Only an unknown name is an `Err`; every failure of a known tool comes
    /// back as an error envelope inside the result.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, String> {
        let ctx = &self.ctx;
        let result = match name {
            ListProductsTool::NAME => run_tool(&ListProductsTool, arguments, ctx).await,
            SearchProductsTool::NAME => run_tool(&SearchProductsTool, arguments, ctx).await,
            CreateOrderTool::NAME => run_tool(&CreateOrderTool, arguments, ctx).await,
            AbandonedCartsTool::NAME => run_tool(&AbandonedCartsTool, arguments, ctx).await,
            CustomerByIdTool::NAME => run_tool(&CustomerByIdTool, arguments, ctx).await,
            DropiLoginTool::NAME => run_tool(&DropiLoginTool, arguments, ctx).await,
            DropiOrdersTool::NAME => run_tool(&DropiOrdersTool, arguments, ctx).await,
            UpdateOrderTool::NAME => run_tool(&UpdateOrderTool, arguments, ctx).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                return Err(format!("Unknown tool: {}", name));
            }
        };
        Ok(result)
    }
}
