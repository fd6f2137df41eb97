//! Tool-specific error types.

use thiserror::Error;

use crate::core::upstream::UpstreamError;

/// Errors that can occur during a tool call.
///
/// Never propagated past the tool boundary: every variant is turned into a
/// failure envelope (see [`super::envelope`]).
#[derive(Debug, Error)]
pub enum ToolError {
    /// The input failed validation; no request was sent.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The single outbound call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Classification carried by a failure envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailure,
    Timeout,
    HttpStatus(u16),
    NetworkFailure,
    DecodeFailure,
}

impl ErrorKind {
    /// Wire name used in the envelope's `kind` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailure => "validation_failure",
            Self::Timeout => "timeout",
            Self::HttpStatus(_) => "http_status",
            Self::NetworkFailure => "network_failure",
            Self::DecodeFailure => "decode_failure",
        }
    }

    /// Upstream status code, for `HttpStatus` only.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus(status) => Some(*status),
            _ => None,
        }
    }
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArguments(_) => ErrorKind::ValidationFailure,
            Self::Upstream(error) => match error {
                UpstreamError::Timeout(_) => ErrorKind::Timeout,
                UpstreamError::Status { status, .. } => ErrorKind::HttpStatus(*status),
                UpstreamError::Network(_) => ErrorKind::NetworkFailure,
                UpstreamError::Decode { .. } => ErrorKind::DecodeFailure,
                UpstreamError::InvalidRequest(_) => ErrorKind::ValidationFailure,
            },
        }
    }

    /// Raw upstream body, when one was received.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Upstream(UpstreamError::Status { body, .. })
            | Self::Upstream(UpstreamError::Decode { body, .. }) => Some(body.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            ToolError::invalid_arguments("x").kind(),
            ErrorKind::ValidationFailure
        );
        assert_eq!(
            ToolError::from(UpstreamError::Timeout(Duration::from_secs(1))).kind(),
            ErrorKind::Timeout
        );
        assert_eq!(
            ToolError::from(UpstreamError::Network("reset".into())).kind(),
            ErrorKind::NetworkFailure
        );
        assert_eq!(
            ToolError::from(UpstreamError::InvalidRequest("bad header".into())).kind(),
            ErrorKind::ValidationFailure
        );
    }

    #[test]
    fn test_status_carries_code_and_detail() {
        let error = ToolError::from(UpstreamError::Status {
            status: 422,
            reason: "Unprocessable Entity".into(),
            body: "{\"errors\":{}}".into(),
        });
        assert_eq!(error.kind(), ErrorKind::HttpStatus(422));
        assert_eq!(error.kind().status(), Some(422));
        assert_eq!(error.kind().as_str(), "http_status");
        assert_eq!(error.detail(), Some("{\"errors\":{}}"));
        assert_eq!(error.to_string(), "HTTP 422 Unprocessable Entity");
    }
}
