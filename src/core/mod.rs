//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! error handling, configuration, the bounded upstream HTTP client, server
//! lifecycle management and transport layer abstractions.

pub mod config;
pub mod error;
pub mod secret;
pub mod server;
pub mod transport;
pub mod upstream;

pub use config::Config;
pub use error::{Error, Result};
pub use secret::Secret;
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
pub use upstream::{UpstreamClient, UpstreamError, UpstreamRequest};
