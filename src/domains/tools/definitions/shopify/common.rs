//! Common pieces of the Shopify admin API tools.
//!
//! Endpoints live under `https://{shop}/admin/api/{version}/` and authenticate
//! with the `X-Shopify-Access-Token` header.

use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::super::common::{require_non_empty, require_secret};
use crate::core::{Secret, UpstreamRequest};
use crate::domains::tools::{ToolContext, ToolError};

/// Suffix every Shopify-hosted store domain carries.
pub const MYSHOPIFY_SUFFIX: &str = ".myshopify.com";

/// Store domain plus admin API token, supplied on every call.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StoreAccess {
    /// Store domain, e.g. `my-store.myshopify.com`.
    #[schemars(description = "Shopify store domain, e.g. 'my-store.myshopify.com'")]
    pub shop: String,

    /// Admin API access token.
    #[serde(rename = "accessToken")]
    #[schemars(description = "Private Shopify Admin API access token")]
    pub access_token: Secret,
}

impl StoreAccess {
    pub fn validate(&self) -> Result<(), ToolError> {
        validate_shop(&self.shop)?;
        require_secret("accessToken", &self.access_token)
    }
}

/// A catalog product. `id` and `title` are required; every other field is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `GET products.json`.
#[derive(Debug, Deserialize)]
pub struct ProductsPage {
    pub products: Vec<Product>,
}

/// Check the shop value is a bare host name usable in a URL.
pub fn validate_shop(shop: &str) -> Result<(), ToolError> {
    require_non_empty("shop", shop)?;

    let bare = shop
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !bare {
        return Err(ToolError::invalid_arguments(format!(
            "'shop' must be a bare domain such as 'my-store{MYSHOPIFY_SUFFIX}', got '{shop}'"
        )));
    }
    Ok(())
}

/// Check the shop value is a `*.myshopify.com` domain.
pub fn validate_myshopify_domain(shop: &str) -> Result<(), ToolError> {
    validate_shop(shop)?;

    let has_store = shop
        .strip_suffix(MYSHOPIFY_SUFFIX)
        .is_some_and(|store| !store.is_empty());
    if !has_store {
        return Err(ToolError::invalid_arguments(format!(
            "The store domain must be a valid Shopify domain ending in '{MYSHOPIFY_SUFFIX}', got '{shop}'"
        )));
    }
    Ok(())
}

/// Build an admin API URL for `resource` (e.g. `products.json?limit=50`).
pub fn admin_url(ctx: &ToolContext, shop: &str, resource: &str) -> String {
    let shopify = &ctx.config().upstream.shopify;
    let origin = match &shopify.base_url {
        Some(base) => base.clone(),
        None => format!("https://{shop}"),
    };
    format!("{origin}/admin/api/{}/{resource}", shopify.api_version)
}

/// Admin API request with the authentication and JSON headers set.
pub fn admin_request(
    method: Method,
    url: String,
    access: &StoreAccess,
    deadline: Duration,
) -> UpstreamRequest {
    UpstreamRequest::new(method, url, deadline)
        .sensitive_header("x-shopify-access-token", access.access_token.expose())
        .header("content-type", "application/json")
        .header("accept", "application/json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::context_for;

    #[test]
    fn test_validate_shop() {
        assert!(validate_shop("my-store.myshopify.com").is_ok());
        assert!(validate_shop("shop.example.com").is_ok());
        assert!(validate_shop("").is_err());
        assert!(validate_shop("https://my-store.myshopify.com").is_err());
        assert!(validate_shop("evil.com/admin").is_err());
    }

    #[test]
    fn test_validate_myshopify_domain() {
        assert!(validate_myshopify_domain("my-store.myshopify.com").is_ok());
        assert!(validate_myshopify_domain("my-store.example.com").is_err());
        assert!(validate_myshopify_domain(".myshopify.com").is_err());
        assert!(validate_myshopify_domain("my-store.myshopify.com.evil.io").is_err());
    }

    #[test]
    fn test_admin_url_default_origin() {
        let ctx = crate::domains::tools::testing::default_context();
        assert_eq!(
            admin_url(&ctx, "x.myshopify.com", "products.json?limit=50"),
            "https://x.myshopify.com/admin/api/2023-04/products.json?limit=50"
        );
    }

    #[test]
    fn test_admin_url_override() {
        let ctx = context_for("http://127.0.0.1:4000");
        assert_eq!(
            admin_url(&ctx, "x.myshopify.com", "orders.json"),
            "http://127.0.0.1:4000/admin/api/2023-04/orders.json"
        );
    }

    #[test]
    fn test_product_keeps_extra_fields() {
        let raw = serde_json::json!({"id": 1, "title": "Café", "vendor": "Acme", "tags": ""});
        let product: Product = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(product.extra["vendor"], "Acme");
        assert_eq!(serde_json::to_value(&product).unwrap(), raw);
    }
}
