//! Dropi order status update tool.

use std::fmt;

use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::common::{authorized_request, dropi_url};
use crate::core::Secret;
use crate::domains::tools::definitions::common::{require_path_id, require_secret};
use crate::domains::tools::{ToolContext, ToolError, UpstreamTool};

/// Statuses a seller may set on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DropiOrderStatus {
    Confirmado,
    Cancelado,
}

impl DropiOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropiOrderStatus::Confirmado => "CONFIRMADO",
            DropiOrderStatus::Cancelado => "CANCELADO",
        }
    }
}

impl fmt::Display for DropiOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OrderStatusChange {
    #[schemars(description = "Session token from login_dropi")]
    pub token: Secret,

    #[schemars(description = "Id of the order to update")]
    pub order_id: String,

    #[schemars(description = "New status: CONFIRMADO or CANCELADO")]
    pub status: DropiOrderStatus,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateOrderParams {
    #[schemars(description = "Data for the order update")]
    pub input: OrderStatusChange,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: DropiOrderStatus,
}

/// Structured output of a status change.
#[derive(Debug, Clone, Serialize)]
pub struct OrderUpdated {
    pub order_id: String,
    pub status: DropiOrderStatus,
    pub data: Value,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateOrderTool;

#[async_trait::async_trait]
impl UpstreamTool for UpdateOrderTool {
    const NAME: &'static str = "update_order_dropi";

    const DESCRIPTION: &'static str = "Set the status of a Dropi order to CONFIRMADO or CANCELADO.";

    type Params = UpdateOrderParams;
    type Output = OrderUpdated;

    fn validate(&self, params: &UpdateOrderParams) -> Result<(), ToolError> {
        require_secret("token", &params.input.token)?;
        require_path_id("order_id", &params.input.order_id, false)
    }

    async fn execute(
        &self,
        params: UpdateOrderParams,
        ctx: &ToolContext,
    ) -> Result<OrderUpdated, ToolError> {
        let OrderStatusChange {
            token,
            order_id,
            status,
        } = params.input;
        info!("Setting Dropi order {} to {}", order_id, status);

        let url = dropi_url(ctx, &format!("api/orders/myorders/{order_id}"));
        let request =
            authorized_request(ctx, Method::PUT, url, &token).json(&StatusBody { status })?;
        let data: Value = ctx.client().call(request).await?;

        Ok(OrderUpdated {
            order_id,
            status,
            data,
        })
    }

    fn summarize(&self, output: &OrderUpdated) -> String {
        format!(
            "Order {} updated to status {}",
            output.order_id, output.status
        )
    }
}
