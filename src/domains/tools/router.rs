//! Tool Router - builds the rmcp ToolRouter for the STDIO transport.
//!
//! Routes are generated from each tool's [`UpstreamTool`](super::UpstreamTool)
//! implementation by [`create_route`].

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{
    AbandonedCartsTool, CreateOrderTool, CustomerByIdTool, DropiLoginTool, DropiOrdersTool,
    ListProductsTool, SearchProductsTool, UpdateOrderTool,
};
use super::handlers::{ToolContext, create_route};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(ctx: ToolContext) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(create_route::<ListProductsTool, S>(ctx.clone()))
        .with_route(create_route::<SearchProductsTool, S>(ctx.clone()))
        .with_route(create_route::<CreateOrderTool, S>(ctx.clone()))
        .with_route(create_route::<AbandonedCartsTool, S>(ctx.clone()))
        .with_route(create_route::<CustomerByIdTool, S>(ctx.clone()))
        .with_route(create_route::<DropiLoginTool, S>(ctx.clone()))
        .with_route(create_route::<DropiOrdersTool, S>(ctx.clone()))
        .with_route(create_route::<UpdateOrderTool, S>(ctx))
}
