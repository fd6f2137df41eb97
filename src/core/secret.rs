//! Redacted string wrapper for per-call credentials.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A credential supplied by the caller (access token, password, bearer token).
///
/// Serializes and deserializes as a plain string so tool schemas stay
/// unchanged, but never prints its value through `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw value for use in an outbound header or body.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_redacted_in_debug() {
        let secret = Secret::new("shpat_super_secret");
        let debug_str = format!("{:?}", secret);
        assert_eq!(debug_str, "[REDACTED]");
        assert!(!debug_str.contains("shpat"));
    }

    #[test]
    fn test_secret_is_transparent_json() {
        let secret: Secret = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(secret.expose(), "abc");
        assert_eq!(serde_json::to_string(&secret).unwrap(), r#""abc""#);
    }

    #[test]
    fn test_secret_blank_is_empty() {
        assert!(Secret::new("   ").is_empty());
        assert!(!Secret::new("t").is_empty());
    }
}
