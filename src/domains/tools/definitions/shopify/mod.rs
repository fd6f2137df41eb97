//! Shopify admin API tools.

pub mod abandoned_carts;
pub mod common;
pub mod create_order;
pub mod customer;
pub mod list_products;
pub mod search_products;

pub use abandoned_carts::AbandonedCartsTool;
pub use create_order::CreateOrderTool;
pub use customer::CustomerByIdTool;
pub use list_products::ListProductsTool;
pub use search_products::SearchProductsTool;
