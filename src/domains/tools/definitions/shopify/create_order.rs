//! Shopify order creation tool.

use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::common::{StoreAccess, admin_request, admin_url};
use crate::core::Secret;
use crate::domains::tools::definitions::common::require_email;
use crate::domains::tools::{ToolContext, ToolError, UpstreamTool};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Postal address, in Shopify's field names.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Address {
    #[schemars(description = "Recipient first name")]
    pub first_name: String,
    #[schemars(description = "Recipient last name")]
    pub last_name: String,
    #[schemars(description = "Street address")]
    pub address1: String,
    pub city: String,
    #[schemars(description = "Province, department or state")]
    pub province: String,
    pub country: String,
    #[schemars(description = "Postal code")]
    pub zip: String,
    #[schemars(description = "Contact phone number")]
    pub phone: String,
}

/// Customer placing the order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OrderCustomer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// A product variant and quantity.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LineItemInput {
    #[serde(rename = "variantId")]
    #[schemars(description = "Numeric id of the product variant")]
    pub variant_id: u64,

    #[schemars(description = "Number of units")]
    pub quantity: u32,
}

/// Complete order description.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OrderData {
    #[schemars(description = "Shopify store domain, e.g. 'my-store.myshopify.com'")]
    pub shop: String,

    #[serde(rename = "accessToken")]
    #[schemars(description = "Private Shopify Admin API access token")]
    pub access_token: Secret,

    #[schemars(description = "Email address that receives order notifications")]
    pub email: String,

    #[serde(default)]
    #[schemars(description = "Initial fulfillment status ('fulfilled', 'unfulfilled', ...). Optional.")]
    pub fulfillment_status: Option<String>,

    #[serde(default)]
    #[schemars(description = "Whether Shopify emails the order receipt to the customer. Optional.")]
    pub send_receipt: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Whether Shopify emails the fulfillment receipt once shipped. Optional.")]
    pub send_fulfillment_receipt: Option<bool>,

    #[serde(rename = "lineItems")]
    pub line_items: Vec<LineItemInput>,

    #[serde(rename = "shippingAddress")]
    pub shipping_address: Address,

    #[serde(rename = "billingAddress")]
    pub billing_address: Address,

    pub customer: OrderCustomer,
}

/// Parameters for the order creation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateOrderParams {
    #[serde(rename = "orderData")]
    #[schemars(description = "Complete purchase order information")]
    pub order_data: OrderData,
}

// ============================================================================
// Upstream Records
// ============================================================================

#[derive(Debug, Serialize)]
struct NewOrderBody<'a> {
    order: NewOrder<'a>,
}

#[derive(Debug, Serialize)]
struct NewOrder<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fulfillment_status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_receipt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_fulfillment_receipt: Option<bool>,
    billing_address: &'a Address,
    shipping_address: &'a Address,
    line_items: Vec<NewLineItem>,
    customer: &'a OrderCustomer,
}

#[derive(Debug, Serialize)]
struct NewLineItem {
    variant_id: u64,
    quantity: u32,
}

impl<'a> From<&'a OrderData> for NewOrderBody<'a> {
    fn from(data: &'a OrderData) -> Self {
        Self {
            order: NewOrder {
                email: &data.email,
                fulfillment_status: data.fulfillment_status.as_deref(),
                send_receipt: data.send_receipt,
                send_fulfillment_receipt: data.send_fulfillment_receipt,
                billing_address: &data.billing_address,
                shipping_address: &data.shipping_address,
                line_items: data
                    .line_items
                    .iter()
                    .map(|item| NewLineItem {
                        variant_id: item.variant_id,
                        quantity: item.quantity,
                    })
                    .collect(),
                customer: &data.customer,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedOrderResponse {
    order: CreatedOrder,
}

#[derive(Debug, Deserialize)]
struct CreatedOrder {
    id: u64,
    #[serde(default)]
    email: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Structured output for a created order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderCreated {
    pub order_id: u64,
    pub email: Option<String>,
}

/// Shopify order creation tool.
#[derive(Debug, Clone, Default)]
pub struct CreateOrderTool;

#[async_trait::async_trait]
impl UpstreamTool for CreateOrderTool {
    const NAME: &'static str = "create-shopify-order";

    const DESCRIPTION: &'static str = "Create an order in a Shopify store from line items (variant id + quantity), shipping and billing addresses and customer details. Returns the new order number and email.";

    type Params = CreateOrderParams;
    type Output = OrderCreated;

    fn validate(&self, params: &CreateOrderParams) -> Result<(), ToolError> {
        let data = &params.order_data;

        StoreAccess {
            shop: data.shop.clone(),
            access_token: data.access_token.clone(),
        }
        .validate()?;
        require_email("email", &data.email)?;
        require_email("customer.email", &data.customer.email)?;

        if data.line_items.is_empty() {
            return Err(ToolError::invalid_arguments(
                "'lineItems' must contain at least one item",
            ));
        }
        if let Some(item) = data.line_items.iter().find(|item| item.quantity == 0) {
            return Err(ToolError::invalid_arguments(format!(
                "Quantity for variant {} must be at least 1",
                item.variant_id
            )));
        }
        Ok(())
    }

    async fn execute(
        &self,
        params: CreateOrderParams,
        ctx: &ToolContext,
    ) -> Result<OrderCreated, ToolError> {
        let data = &params.order_data;
        info!(
            "Creating order in {} with {} line item(s)",
            data.shop,
            data.line_items.len()
        );

        let access = StoreAccess {
            shop: data.shop.clone(),
            access_token: data.access_token.clone(),
        };
        let url = admin_url(ctx, &data.shop, "orders.json");
        let request = admin_request(Method::POST, url, &access, ctx.long_deadline())
            .json(&NewOrderBody::from(data))?;

        let created: CreatedOrderResponse = ctx.client().call(request).await?;
        info!("Created order #{}", created.order.id);

        Ok(OrderCreated {
            order_id: created.order.id,
            email: created.order.email,
        })
    }

    fn summarize(&self, output: &OrderCreated) -> String {
        format!(
            "Order created successfully. Order number: #{}, Email: {}",
            output.order_id,
            output.email.as_deref().unwrap_or("none")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{context_for, text_of};
    use crate::domains::tools::{ErrorKind, call_envelope, run_tool};
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn address() -> Value {
        json!({
            "first_name": "Ana",
            "last_name": "Gómez",
            "address1": "Calle 1 #2-3",
            "city": "Bogotá",
            "province": "Cundinamarca",
            "country": "CO",
            "zip": "110111",
            "phone": "+573001112233"
        })
    }

    fn order_args() -> Value {
        json!({
            "orderData": {
                "shop": "x.myshopify.com",
                "accessToken": "t",
                "email": "ana@example.com",
                "send_receipt": true,
                "lineItems": [{"variantId": 4455, "quantity": 2}],
                "shippingAddress": address(),
                "billingAddress": address(),
                "customer": {
                    "email": "ana@example.com",
                    "first_name": "Ana",
                    "last_name": "Gómez",
                    "phone": "+573001112233"
                }
            }
        })
    }

    #[tokio::test]
    async fn test_translates_body_and_reports_order() {
        let server = MockServer::start().await;
        let expected_body = json!({
            "order": {
                "email": "ana@example.com",
                "send_receipt": true,
                "billing_address": address(),
                "shipping_address": address(),
                "line_items": [{"variant_id": 4455, "quantity": 2}],
                "customer": {
                    "email": "ana@example.com",
                    "first_name": "Ana",
                    "last_name": "Gómez",
                    "phone": "+573001112233"
                }
            }
        });
        Mock::given(method("POST"))
            .and(path("/admin/api/2023-04/orders.json"))
            .and(header("x-shopify-access-token", "t"))
            .and(body_json(expected_body))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"order": {"id": 450789469, "email": "ana@example.com"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let result = run_tool(&CreateOrderTool, order_args(), &ctx).await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            text_of(&result),
            "Order created successfully. Order number: #450789469, Email: ana@example.com"
        );
        assert_eq!(
            result.structured_content.unwrap()["payload"],
            json!({"order_id": 450789469u64, "email": "ana@example.com"})
        );
    }

    #[tokio::test]
    async fn test_unprocessable_order_keeps_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_string("{\"errors\":{\"line_items\":[\"is invalid\"]}}"),
            )
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let envelope = call_envelope(&CreateOrderTool, order_args(), &ctx).await;

        let failure = envelope.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::HttpStatus(422));
        assert_eq!(
            failure.detail.as_deref(),
            Some("{\"errors\":{\"line_items\":[\"is invalid\"]}}")
        );
    }

    #[tokio::test]
    async fn test_invalid_inputs_rejected_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        let ctx = context_for(&server.uri());

        let mut bad_email = order_args();
        bad_email["orderData"]["email"] = json!("not-an-email");

        let mut no_items = order_args();
        no_items["orderData"]["lineItems"] = json!([]);

        let mut zero_quantity = order_args();
        zero_quantity["orderData"]["lineItems"][0]["quantity"] = json!(0);

        let mut missing_address = order_args();
        missing_address["orderData"]
            .as_object_mut()
            .unwrap()
            .remove("billingAddress");

        for args in [bad_email, no_items, zero_quantity, missing_address] {
            let envelope = call_envelope(&CreateOrderTool, args, &ctx).await;
            assert_eq!(envelope.failure().unwrap().kind, ErrorKind::ValidationFailure);
        }
    }
}
