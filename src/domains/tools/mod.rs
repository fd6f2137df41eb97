//! Tools domain module.
//!
//! Tools are the functions MCP clients call. Each one wraps a single bounded
//! request to the Shopify admin API or the Dropi logistics API and answers
//! with a uniform result envelope.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The `UpstreamTool` trait and the generic call plumbing
//! - `envelope.rs` - Success/failure envelope returned by every call
//! - `router.rs` - ToolRouter builder for the STDIO transport
//! - `registry.rs` - Tool listing and name-based dispatch for HTTP
//! - `error.rs` - Tool error types and failure kinds
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` implementing `UpstreamTool`
//! 2. Export it from the matching `mod.rs`
//! 3. Add its route in `router.rs` and its entry in `registry.rs`

pub mod definitions;
mod envelope;
mod error;
mod handlers;
mod registry;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use envelope::{Envelope, Failure};
pub use error::{ErrorKind, ToolError};
pub use handlers::*;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
