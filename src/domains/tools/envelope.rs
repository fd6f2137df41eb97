//! Uniform result envelope returned by every tool call.
//!
//! Serialized shapes:
//!
//! ```json
//! { "ok": true, "payload": { ... } }
//! { "ok": false, "kind": "http_status", "status": 404, "message": "HTTP 404 Not Found", "detail": "..." }
//! ```

use rmcp::model::{CallToolResult, Content};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

use super::error::{ErrorKind, ToolError};

/// Failure half of the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl From<ToolError> for Failure {
    fn from(error: ToolError) -> Self {
        Self {
            kind: error.kind(),
            detail: error.detail().map(str::to_string),
            message: error.to_string(),
        }
    }
}

/// `{ok: true, payload}` or `{ok: false, kind, message, detail?}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(T),
    Failure(Failure),
}

impl<T> From<Result<T, ToolError>> for Envelope<T> {
    fn from(result: Result<T, ToolError>) -> Self {
        match result {
            Ok(payload) => Self::Success(payload),
            Err(error) => Self::Failure(error.into()),
        }
    }
}

impl<T> Envelope<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// Render as an MCP tool result.
    ///
    /// The envelope goes into `structuredContent`; the text part carries a
    /// human-readable summary (success) or the message and detail (failure).
    pub fn into_call_result(self, summarize: impl FnOnce(&T) -> String) -> CallToolResult {
        let text = match &self {
            Self::Success(payload) => summarize(payload),
            Self::Failure(failure) => match &failure.detail {
                Some(detail) => format!("Error: {}\n{}", failure.message, detail),
                None => format!("Error: {}", failure.message),
            },
        };
        let is_error = !self.is_ok();

        match serde_json::to_value(&self) {
            Ok(structured) => CallToolResult {
                content: vec![Content::text(text)],
                structured_content: Some(structured),
                is_error: Some(is_error),
                meta: None,
            },
            Err(e) => {
                warn!("Failed to serialize tool envelope: {}", e);
                CallToolResult::error(vec![Content::text(format!(
                    "Error: failed to serialize tool result: {e}"
                ))])
            }
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(payload) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("ok", &true)?;
                map.serialize_entry("payload", payload)?;
                map.end()
            }
            Self::Failure(failure) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("ok", &false)?;
                map.serialize_entry("kind", failure.kind.as_str())?;
                if let Some(status) = failure.kind.status() {
                    map.serialize_entry("status", &status)?;
                }
                map.serialize_entry("message", &failure.message)?;
                if let Some(detail) = &failure.detail {
                    map.serialize_entry("detail", detail)?;
                }
                map.end()
            }
        }
    }
}
