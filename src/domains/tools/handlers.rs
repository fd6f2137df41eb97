//! Shared tool plumbing.
//!
//! Every tool implements [`UpstreamTool`]. The generic helpers here turn an
//! implementation into rmcp metadata ([`to_tool`]), a stdio route
//! ([`create_route`]) and an envelope-producing call ([`run_tool`]), so tool
//! files only hold parameters, validation and the response mapping.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, instrument, warn};

use super::envelope::Envelope;
use super::error::ToolError;
use crate::core::config::Config;
use crate::core::upstream::UpstreamClient;

/// Everything a tool call may use: process configuration and the HTTP client.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    client: UpstreamClient,
}

impl ToolContext {
    pub fn new(config: Arc<Config>, client: UpstreamClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &UpstreamClient {
        &self.client
    }

    /// Deadline for reads and quick writes.
    pub fn short_deadline(&self) -> Duration {
        self.config.upstream.timeouts.short()
    }

    /// Deadline for slow upstream operations.
    pub fn long_deadline(&self) -> Duration {
        self.config.upstream.timeouts.long()
    }
}

/// A tool backed by a single upstream HTTP call.
#[async_trait::async_trait]
pub trait UpstreamTool: Default + Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Input record; its JSON schema is advertised to clients.
    type Params: DeserializeOwned + JsonSchema + Send + Sync + 'static;

    /// Success payload.
    type Output: Serialize + Send;

    /// Checks the schema cannot express. Runs before any I/O.
    fn validate(&self, _params: &Self::Params) -> Result<(), ToolError> {
        Ok(())
    }

    /// Issue the upstream call and map its response.
    async fn execute(
        &self,
        params: Self::Params,
        ctx: &ToolContext,
    ) -> Result<Self::Output, ToolError>;

    /// Text shown alongside the structured payload.
    fn summarize(&self, output: &Self::Output) -> String;
}

/// Parse, validate and execute one call, always producing an envelope.
#[instrument(skip_all, fields(tool = T::NAME))]
pub async fn call_envelope<T: UpstreamTool>(
    tool: &T,
    arguments: serde_json::Value,
    ctx: &ToolContext,
) -> Envelope<T::Output> {
    let params = match serde_json::from_value::<T::Params>(arguments) {
        Ok(params) => params,
        Err(e) => {
            warn!("Rejected arguments: {}", e);
            return Envelope::from(Err(ToolError::invalid_arguments(e.to_string())));
        }
    };

    if let Err(e) = tool.validate(&params) {
        warn!("Validation failed: {}", e);
        return Envelope::from(Err(e));
    }

    let envelope = Envelope::from(tool.execute(params, ctx).await);
    match envelope.failure() {
        None => info!("Tool call succeeded"),
        Some(failure) => warn!(kind = failure.kind.as_str(), "Tool call failed: {}", failure.message),
    }
    envelope
}

/// Run a call and render it as an MCP tool result.
pub async fn run_tool<T: UpstreamTool>(
    tool: &T,
    arguments: serde_json::Value,
    ctx: &ToolContext,
) -> CallToolResult {
    call_envelope(tool, arguments, ctx)
        .await
        .into_call_result(|output| tool.summarize(output))
}

/// Create a Tool model (metadata) for `T`.
pub fn to_tool<T: UpstreamTool>() -> Tool {
    Tool {
        name: T::NAME.into(),
        description: Some(T::DESCRIPTION.into()),
        input_schema: schema_for_type::<T::Params>().into(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Create a ToolRoute for the STDIO transport.
///
/// Malformed arguments come back as a validation failure envelope instead
/// of a protocol error, so callers always see the same result shape.
pub fn create_route<T, S>(ctx: ToolContext) -> ToolRoute<S>
where
    T: UpstreamTool,
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(to_tool::<T>(), move |call: ToolCallContext<'_, S>| {
        let args = call.arguments.clone().unwrap_or_default();
        let ctx = ctx.clone();
        async move {
            let tool = T::default();
            Ok::<_, McpError>(run_tool(&tool, serde_json::Value::Object(args), &ctx).await)
        }
        .boxed()
    })
}
