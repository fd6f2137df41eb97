//! Common pieces of the Dropi logistics API tools.

use reqwest::Method;

use crate::core::{Secret, UpstreamRequest};
use crate::domains::tools::ToolContext;

/// Build a Dropi API URL for `path` (e.g. `api/login`).
pub fn dropi_url(ctx: &ToolContext, path: &str) -> String {
    format!("{}/{path}", ctx.config().upstream.dropi.base_url)
}

/// Request with the JSON and origin headers Dropi expects.
pub fn dropi_request(ctx: &ToolContext, method: Method, url: String) -> UpstreamRequest {
    let request = UpstreamRequest::new(method, url, ctx.short_deadline())
        .header("accept", "application/json, text/plain, */*")
        .header("content-type", "application/json");

    match &ctx.config().upstream.dropi.origin {
        Some(origin) => request
            .header("origin", origin.clone())
            .header("referer", format!("{origin}/")),
        None => request,
    }
}

/// [`dropi_request`] authenticated with a session token.
pub fn authorized_request(
    ctx: &ToolContext,
    method: Method,
    url: String,
    token: &Secret,
) -> UpstreamRequest {
    dropi_request(ctx, method, url)
        .sensitive_header("x-authorization", format!("Bearer {}", token.expose()))
}
