//! Bounded outbound HTTP calls.
//!
//! Every tool issues exactly one request through [`UpstreamClient::call`].
//! The send and the full body read run under a single deadline; when it
//! elapses the request future is dropped, which cancels the in-flight
//! request. Non-2xx bodies are always read before classification so the
//! caller can report them.

use reqwest::{
    Client, Method, StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Failure of a single bounded call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The deadline elapsed before the response was fully received.
    #[error("Upstream request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// The upstream answered outside the 2xx range.
    #[error("HTTP {status} {reason}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    /// DNS, connect, reset or another transport-level failure.
    #[error("Upstream connection failed: {0}")]
    Network(String),

    /// A 2xx body that does not match the expected record.
    #[error("Unexpected upstream response: {message}")]
    Decode { message: String, body: String },

    /// The request could not be built from the given inputs.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

struct PendingHeader {
    name: &'static str,
    value: String,
    sensitive: bool,
}

/// Description of one outbound request.
pub struct UpstreamRequest {
    method: Method,
    url: String,
    headers: Vec<PendingHeader>,
    body: Option<serde_json::Value>,
    deadline: Duration,
}

impl UpstreamRequest {
    pub fn new(method: Method, url: impl Into<String>, deadline: Duration) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            deadline,
        }
    }

    pub fn get(url: impl Into<String>, deadline: Duration) -> Self {
        Self::new(Method::GET, url, deadline)
    }

    pub fn post(url: impl Into<String>, deadline: Duration) -> Self {
        Self::new(Method::POST, url, deadline)
    }

    pub fn put(url: impl Into<String>, deadline: Duration) -> Self {
        Self::new(Method::PUT, url, deadline)
    }

    /// Add a header.
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push(PendingHeader {
            name,
            value: value.into(),
            sensitive: false,
        });
        self
    }

    /// Add a header carrying a credential; it is marked sensitive so it is
    /// left out of the HTTP stack's debug output.
    pub fn sensitive_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push(PendingHeader {
            name,
            value: value.into(),
            sensitive: true,
        });
        self
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, UpstreamError> {
        let value = serde_json::to_value(body)
            .map_err(|e| UpstreamError::InvalidRequest(format!("Unserializable body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    pub(crate) fn header_map(&self) -> Result<HeaderMap, UpstreamError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for header in &self.headers {
            let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(|_| {
                UpstreamError::InvalidRequest(format!("Invalid header name '{}'", header.name))
            })?;
            let mut value = HeaderValue::from_str(&header.value).map_err(|_| {
                UpstreamError::InvalidRequest(format!(
                    "Header '{}' contains characters not allowed in HTTP headers",
                    header.name
                ))
            })?;
            value.set_sensitive(header.sensitive);
            map.insert(name, value);
        }
        Ok(map)
    }
}

/// Shared, cheaply clonable HTTP client for bounded calls.
///
/// Only the connection pool is shared; every call owns its own deadline and
/// request future.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
}

impl UpstreamClient {
    /// Build a client with the crate's user agent.
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = Self::builder().build()?;
        Ok(Self { http })
    }

    /// Client settings shared by every upstream client.
    ///
    /// Redirects are never followed: a 3xx is reported as a status failure
    /// and credentials stay with the host they were addressed to.
    pub fn builder() -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Issue the request and decode a 2xx body into `T`.
    ///
    /// An empty 2xx body decodes as JSON `null`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        request: UpstreamRequest,
    ) -> Result<T, UpstreamError> {
        let body = self.exchange(request).await?;
        let text = if body.trim().is_empty() { "null" } else { body.as_str() };

        serde_json::from_str(text).map_err(|e| UpstreamError::Decode {
            message: e.to_string(),
            body,
        })
    }

    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    async fn exchange(&self, request: UpstreamRequest) -> Result<String, UpstreamError> {
        let headers = request.header_map()?;
        let deadline = request.deadline;

        let mut builder = self
            .http
            .request(request.method, &request.url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<(StatusCode, String), reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(deadline, exchange).await {
            Ok(Ok(received)) => received,
            Ok(Err(e)) => {
                let error = classify(e, deadline);
                warn!("Upstream request failed: {}", error);
                return Err(error);
            }
            Err(_) => {
                warn!("Upstream request cancelled after {:?}", deadline);
                return Err(UpstreamError::Timeout(deadline));
            }
        };

        debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "Upstream responded"
        );

        if !status.is_success() {
            warn!("Upstream returned {}", status);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            });
        }

        Ok(body)
    }
}

fn classify(error: reqwest::Error, deadline: Duration) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout(deadline)
    } else if error.is_connect() {
        UpstreamError::Network(format!("Connection failed: {error}"))
    } else {
        UpstreamError::Network(error.to_string())
    }
}
