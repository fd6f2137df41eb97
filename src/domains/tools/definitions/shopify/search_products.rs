//! Shopify product search tool.
//!
//! Shopify's REST products endpoint has no title search, so one bounded page
//! is fetched and filtered locally with an accent- and case-insensitive
//! substring match.

use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use super::common::{Product, ProductsPage, StoreAccess, admin_request, admin_url};
use crate::core::Secret;
use crate::domains::tools::{ToolContext, ToolError, UpstreamTool};

/// Page size requested from Shopify before filtering.
const PAGE_SIZE: u32 = 100;

/// Fold a string for matching: lowercase, decompose (NFD), drop combining
/// diacritics U+0300..=U+036F, trim.
///
/// `normalize(&normalize(s)) == normalize(s)` for every `s`.
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parameters for the product search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchProductsParams {
    #[schemars(description = "Shopify store domain, e.g. 'my-store.myshopify.com'")]
    pub shop: String,

    #[serde(rename = "accessToken")]
    #[schemars(description = "Private Shopify Admin API access token")]
    pub access_token: Secret,

    #[schemars(description = "Keyword to look for in product titles (case and accent insensitive)")]
    pub keyword: String,
}

impl SearchProductsParams {
    fn access(&self) -> StoreAccess {
        StoreAccess {
            shop: self.shop.clone(),
            access_token: self.access_token.clone(),
        }
    }
}

/// Search outcome; an empty match set is a result, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProductSearchOutcome {
    Found {
        keyword: String,
        count: usize,
        products: Vec<Product>,
    },
    NoResults {
        keyword: String,
    },
}

/// Keep the products whose folded title contains the folded keyword.
pub fn filter_by_title(products: Vec<Product>, keyword: &str) -> Vec<Product> {
    let needle = normalize(keyword);
    products
        .into_iter()
        .filter(|p| normalize(&p.title).contains(&needle))
        .collect()
}

/// Shopify product search tool.
#[derive(Debug, Clone, Default)]
pub struct SearchProductsTool;

#[async_trait::async_trait]
impl UpstreamTool for SearchProductsTool {
    const NAME: &'static str = "search-shopify-products";

    const DESCRIPTION: &'static str = "Search a Shopify store's products by keyword. Matches are partial and ignore case and accents (\"cafe\" finds \"Café\"). Searches the first 100 products.";

    type Params = SearchProductsParams;
    type Output = ProductSearchOutcome;

    fn validate(&self, params: &SearchProductsParams) -> Result<(), ToolError> {
        params.access().validate()?;
        if normalize(&params.keyword).is_empty() {
            return Err(ToolError::invalid_arguments("'keyword' must not be empty"));
        }
        Ok(())
    }

    async fn execute(
        &self,
        params: SearchProductsParams,
        ctx: &ToolContext,
    ) -> Result<ProductSearchOutcome, ToolError> {
        info!("Searching products in {} for '{}'", params.shop, params.keyword);

        let url = admin_url(ctx, &params.shop, &format!("products.json?limit={PAGE_SIZE}"));
        let request = admin_request(Method::GET, url, &params.access(), ctx.short_deadline());
        let page: ProductsPage = ctx.client().call(request).await?;

        let scanned = page.products.len();
        let matches = filter_by_title(page.products, &params.keyword);
        debug!("{} of {} products matched", matches.len(), scanned);

        if matches.is_empty() {
            return Ok(ProductSearchOutcome::NoResults {
                keyword: params.keyword,
            });
        }

        Ok(ProductSearchOutcome::Found {
            keyword: params.keyword,
            count: matches.len(),
            products: matches,
        })
    }

    fn summarize(&self, output: &ProductSearchOutcome) -> String {
        match output {
            ProductSearchOutcome::NoResults { keyword } => {
                format!("No products found matching '{keyword}'.")
            }
            ProductSearchOutcome::Found {
                keyword,
                count,
                products,
            } => {
                let lines: Vec<String> = products
                    .iter()
                    .map(|p| format!("#{}: {}", p.id, p.title))
                    .collect();
                format!(
                    "Found {count} product(s) matching '{keyword}':\n{}",
                    lines.join("\n")
                )
            }
        }
    }
}
