//! Tool definitions module.
//!
//! Each tool is defined in its own file, grouped by upstream API.

pub mod common;
pub mod dropi;
pub mod shopify;

pub use dropi::{DropiLoginTool, DropiOrdersTool, UpdateOrderTool};
pub use shopify::{
    AbandonedCartsTool, CreateOrderTool, CustomerByIdTool, ListProductsTool, SearchProductsTool,
};
