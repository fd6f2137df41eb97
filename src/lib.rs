//! Commerce MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing the Shopify admin API and
//! the Dropi logistics API as tools. Every tool issues one bounded HTTP call
//! and answers with a uniform result envelope.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Configuration, error handling, the bounded upstream HTTP
//!   client, the main server and the transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: Shopify and Dropi tools callable by MCP clients
//!
//! # Example
//!
//! ```rust,no_run
//! use commerce_mcp_server::{core::McpServer, core::Config, core::TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
