//! Shopify product listing tool.
//!
//! Returns the first page of a store's catalog with every product record
//! passed through as received.

use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info};

use super::common::{Product, ProductsPage, StoreAccess, admin_request, admin_url};
use crate::domains::tools::{ToolContext, ToolError, UpstreamTool};

/// Page size requested from Shopify.
const PAGE_SIZE: u32 = 50;

/// Structured output for a product listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListing {
    pub count: usize,
    pub products: Vec<Product>,
}

/// Shopify product listing tool.
#[derive(Debug, Clone, Default)]
pub struct ListProductsTool;

#[async_trait::async_trait]
impl UpstreamTool for ListProductsTool {
    const NAME: &'static str = "list-shopify-products";

    const DESCRIPTION: &'static str = "List the first page (up to 50) of products in a Shopify store. Returns each product record as provided by the Shopify Admin API.";

    type Params = StoreAccess;
    type Output = ProductListing;

    fn validate(&self, params: &StoreAccess) -> Result<(), ToolError> {
        params.validate()
    }

    async fn execute(
        &self,
        params: StoreAccess,
        ctx: &ToolContext,
    ) -> Result<ProductListing, ToolError> {
        info!("Listing products for {}", params.shop);

        let url = admin_url(ctx, &params.shop, &format!("products.json?limit={PAGE_SIZE}"));
        let request = admin_request(Method::GET, url, &params, ctx.short_deadline());
        let page: ProductsPage = ctx.client().call(request).await?;

        debug!("Received {} products", page.products.len());
        Ok(ProductListing {
            count: page.products.len(),
            products: page.products,
        })
    }

    fn summarize(&self, output: &ProductListing) -> String {
        if output.products.is_empty() {
            return "No products available.".to_string();
        }

        let lines: Vec<String> = output
            .products
            .iter()
            .map(|p| format!("#{}: {}", p.id, p.title))
            .collect();
        format!("Found {} product(s):\n{}", output.count, lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{context_for, context_with_deadlines, text_of};
    use crate::domains::tools::{ErrorKind, call_envelope, run_tool};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_single_record_passes_through_unmodified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2023-04/products.json"))
            .and(query_param("limit", "50"))
            .and(header("x-shopify-access-token", "t"))
            .and(header("accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"products": [{"id": 1, "title": "Café"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let envelope = call_envelope(
            &ListProductsTool,
            json!({"shop": "x.myshopify.com", "accessToken": "t"}),
            &ctx,
        )
        .await;

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"ok": true, "payload": {"count": 1, "products": [{"id": 1, "title": "Café"}]}})
        );
    }

    #[tokio::test]
    async fn test_summary_lists_products() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{"id": 1, "title": "Mug"}, {"id": 2, "title": "Hat", "vendor": "Acme"}]
            })))
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let result = run_tool(
            &ListProductsTool,
            json!({"shop": "x.myshopify.com", "accessToken": "t"}),
            &ctx,
        )
        .await;

        assert_eq!(result.is_error, Some(false));
        let text = text_of(&result);
        assert!(text.contains("#1: Mug"));
        assert!(text.contains("#2: Hat"));
        assert_eq!(
            result.structured_content.unwrap()["payload"]["products"][1]["vendor"],
            "Acme"
        );
    }

    #[tokio::test]
    async fn test_unauthorized_reports_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string("{\"errors\":\"[API] Invalid API key or access token\"}"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let envelope = call_envelope(
            &ListProductsTool,
            json!({"shop": "x.myshopify.com", "accessToken": "wrong"}),
            &ctx,
        )
        .await;

        let failure = envelope.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::HttpStatus(401));
        assert!(failure.detail.as_deref().unwrap().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"products": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_with_deadlines(&server.uri(), 50, 50);
        let envelope = call_envelope(
            &ListProductsTool,
            json!({"shop": "x.myshopify.com", "accessToken": "t"}),
            &ctx,
        )
        .await;

        assert_eq!(envelope.failure().unwrap().kind, ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_missing_token_never_calls_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let envelope =
            call_envelope(&ListProductsTool, json!({"shop": "x.myshopify.com"}), &ctx).await;

        assert_eq!(envelope.failure().unwrap().kind, ErrorKind::ValidationFailure);
    }

    #[tokio::test]
    async fn test_missing_products_key_is_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let envelope = call_envelope(
            &ListProductsTool,
            json!({"shop": "x.myshopify.com", "accessToken": "t"}),
            &ctx,
        )
        .await;

        assert_eq!(envelope.failure().unwrap().kind, ErrorKind::DecodeFailure);
    }
}
