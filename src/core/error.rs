//! Process-level error type.
//!
//! Tool calls never surface these: they are converted into result envelopes
//! at the tool boundary. This type covers startup failures such as building
//! the outbound HTTP client or a transport that cannot serve.

use thiserror::Error;

/// A specialized Result type for server setup and lifecycle.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Transport setup or serving failed.
    #[error("Transport error: {0}")]
    Transport(#[from] crate::core::transport::TransportError),

    /// The outbound HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::TransportError;

    #[test]
    fn test_transport_error_converts() {
        let error: Error = TransportError::init("stdin closed").into();
        assert_eq!(
            error.to_string(),
            "Transport error: Server initialization error: stdin closed"
        );
    }
}
