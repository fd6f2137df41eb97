//! Domains module containing business logic organized by bounded contexts.
//!
//! The server currently exposes a single domain: tools that proxy the
//! Shopify and Dropi REST APIs.

pub mod tools;
