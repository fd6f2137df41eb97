//! Shopify abandoned checkouts tool.

use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::common::{StoreAccess, admin_request, admin_url};
use crate::domains::tools::{ToolContext, ToolError, UpstreamTool};

/// Checkout fields requested from Shopify.
const CHECKOUT_FIELDS: &str = "id,email,created_at,updated_at,line_items,abandoned_checkout_url";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AbandonedCartsParams {
    #[serde(rename = "storeAccess")]
    #[schemars(description = "Store domain and the access token that authorizes the query")]
    pub store_access: StoreAccess,
}

#[derive(Debug, Deserialize)]
struct CheckoutsPage {
    #[serde(default)]
    checkouts: Option<Vec<Value>>,
}

/// Structured output: the checkouts as received.
#[derive(Debug, Clone, Serialize)]
pub struct AbandonedCarts {
    pub count: usize,
    pub checkouts: Vec<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct AbandonedCartsTool;

#[async_trait::async_trait]
impl UpstreamTool for AbandonedCartsTool {
    const NAME: &'static str = "getShopifyAbandonedCarts";

    const DESCRIPTION: &'static str = "Retrieve abandoned checkouts from a Shopify store: id, email, timestamps, line items and the recovery URL of each.";

    type Params = AbandonedCartsParams;
    type Output = AbandonedCarts;

    fn validate(&self, params: &AbandonedCartsParams) -> Result<(), ToolError> {
        params.store_access.validate()
    }

    async fn execute(
        &self,
        params: AbandonedCartsParams,
        ctx: &ToolContext,
    ) -> Result<AbandonedCarts, ToolError> {
        let access = params.store_access;
        info!("Fetching abandoned checkouts for {}", access.shop);

        let url = admin_url(
            ctx,
            &access.shop,
            &format!("checkouts.json?fields={CHECKOUT_FIELDS}"),
        );
        let request = admin_request(Method::GET, url, &access, ctx.long_deadline());
        let page: CheckoutsPage = ctx.client().call(request).await?;

        let checkouts = page.checkouts.unwrap_or_default();
        Ok(AbandonedCarts {
            count: checkouts.len(),
            checkouts,
        })
    }

    fn summarize(&self, output: &AbandonedCarts) -> String {
        if output.checkouts.is_empty() {
            return "No abandoned checkouts found.".to_string();
        }

        let lines: Vec<String> = output
            .checkouts
            .iter()
            .map(|checkout| {
                let id = checkout.get("id").map(Value::to_string).unwrap_or_default();
                let email = checkout
                    .get("email")
                    .and_then(Value::as_str)
                    .unwrap_or("no email");
                format!("#{id}: {email}")
            })
            .collect();
        format!(
            "Found {} abandoned checkout(s):\n{}",
            output.count,
            lines.join("\n")
        )
    }
}
