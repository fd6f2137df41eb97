//! Dropi logistics API tools.

pub mod common;
pub mod list_orders;
pub mod login;
pub mod update_order;

pub use list_orders::DropiOrdersTool;
pub use login::DropiLoginTool;
pub use update_order::UpdateOrderTool;
