//! Test helpers for tool calls against simulated upstreams.

use std::sync::Arc;

use crate::core::config::Config;
use crate::core::upstream::UpstreamClient;

use super::ToolContext;

fn no_proxy_client() -> UpstreamClient {
    UpstreamClient::with_client(UpstreamClient::builder().no_proxy().build().unwrap())
}

/// Context with default configuration.
pub fn default_context() -> ToolContext {
    ToolContext::new(Arc::new(Config::default()), no_proxy_client())
}

/// Context routing both Shopify and Dropi calls to `base_url`.
pub fn context_for(base_url: &str) -> ToolContext {
    context_with_deadlines(base_url, 5_000, 5_000)
}

/// Like [`context_for`] with explicit short/long deadlines in milliseconds.
pub fn context_with_deadlines(base_url: &str, short_ms: u64, long_ms: u64) -> ToolContext {
    let mut config = Config::default();
    config.upstream.shopify.base_url = Some(base_url.to_string());
    config.upstream.dropi.base_url = base_url.to_string();
    config.upstream.timeouts.short_ms = short_ms;
    config.upstream.timeouts.long_ms = long_ms;
    ToolContext::new(Arc::new(config), no_proxy_client())
}

/// Text of the first content part of a tool result.
pub fn text_of(result: &rmcp::model::CallToolResult) -> String {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => text.text.clone(),
        _ => panic!("expected text content"),
    }
}
