//! Shopify customer lookup tool.

use reqwest::Method;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use super::common::{StoreAccess, admin_request, admin_url, validate_myshopify_domain};
use crate::core::Secret;
use crate::domains::tools::definitions::common::{require_path_id, require_secret};
use crate::domains::tools::{ToolContext, ToolError, UpstreamTool};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CustomerLookup {
    #[schemars(description = "Shopify store domain, must end in '.myshopify.com'")]
    pub shop: String,

    #[serde(rename = "accessToken")]
    #[schemars(description = "Private Shopify Admin API access token")]
    pub access_token: Secret,

    #[serde(rename = "customerId")]
    #[schemars(description = "Numeric customer id")]
    pub customer_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CustomerByIdParams {
    #[schemars(description = "Access data and customer id")]
    pub input: CustomerLookup,
}

#[derive(Debug, Deserialize)]
struct CustomerResponse {
    customer: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerByIdTool;

#[async_trait::async_trait]
impl UpstreamTool for CustomerByIdTool {
    const NAME: &'static str = "getShopifyCustomerById";

    const DESCRIPTION: &'static str = "Fetch a single Shopify customer record by its id.";

    type Params = CustomerByIdParams;
    type Output = Map<String, Value>;

    fn validate(&self, params: &CustomerByIdParams) -> Result<(), ToolError> {
        let input = &params.input;
        validate_myshopify_domain(&input.shop)?;
        require_secret("accessToken", &input.access_token)?;
        require_path_id("customerId", &input.customer_id, true)
    }

    async fn execute(
        &self,
        params: CustomerByIdParams,
        ctx: &ToolContext,
    ) -> Result<Map<String, Value>, ToolError> {
        let CustomerLookup {
            shop,
            access_token,
            customer_id,
        } = params.input;
        info!("Fetching customer {} from {}", customer_id, shop);

        let url = admin_url(ctx, &shop, &format!("customers/{customer_id}.json"));
        let access = StoreAccess { shop, access_token };
        let request = admin_request(Method::GET, url, &access, ctx.short_deadline());
        let response: CustomerResponse = ctx.client().call(request).await?;

        Ok(response.customer)
    }

    fn summarize(&self, output: &Map<String, Value>) -> String {
        let field = |name: &str| {
            output
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let id = output.get("id").map(Value::to_string).unwrap_or_default();
        let name = format!("{} {}", field("first_name"), field("last_name"));

        match output.get("email").and_then(Value::as_str) {
            Some(email) => format!("Customer #{id}: {} <{email}>", name.trim()),
            None => format!("Customer #{id}: {}", name.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{context_for, text_of};
    use crate::domains::tools::{ErrorKind, call_envelope, run_tool};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lookup(shop: &str, customer_id: &str) -> Value {
        json!({"input": {"shop": shop, "accessToken": "t", "customerId": customer_id}})
    }

    #[tokio::test]
    async fn test_returns_customer_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2023-04/customers/207119551.json"))
            .and(header("x-shopify-access-token", "t"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "customer": {
                    "id": 207119551,
                    "email": "bob@example.com",
                    "first_name": "Bob",
                    "last_name": "Norman",
                    "orders_count": 1
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let result = run_tool(
            &CustomerByIdTool,
            lookup("x.myshopify.com", "207119551"),
            &ctx,
        )
        .await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            text_of(&result),
            "Customer #207119551: Bob Norman <bob@example.com>"
        );
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["payload"]["orders_count"], 1);
    }

    #[tokio::test]
    async fn test_rejects_foreign_domain_and_bad_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let ctx = context_for(&server.uri());

        for args in [
            lookup("shop.example.com", "1"),
            lookup("x.myshopify.com", "../orders"),
            lookup("x.myshopify.com", ""),
        ] {
            let envelope = call_envelope(&CustomerByIdTool, args, &ctx).await;
            assert_eq!(envelope.failure().unwrap().kind, ErrorKind::ValidationFailure);
        }
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{\"errors\":\"Not Found\"}"))
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let envelope = call_envelope(&CustomerByIdTool, lookup("x.myshopify.com", "42"), &ctx).await;

        let failure = envelope.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::HttpStatus(404));
        assert_eq!(failure.detail.as_deref(), Some("{\"errors\":\"Not Found\"}"));
    }
}
