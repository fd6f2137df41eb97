//! Configuration management for the MCP server.
//!
//! Configuration is process-wide and read once at startup from environment
//! variables (optionally loaded from a `.env` file). Store credentials are not
//! part of it: every tool receives them per call.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Upstream API endpoints and deadlines.
    pub upstream: UpstreamConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Endpoints and deadlines for the third-party APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub shopify: ShopifyConfig,
    pub dropi: DropiConfig,
    pub timeouts: TimeoutConfig,
}

/// Shopify admin API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyConfig {
    /// Admin REST API version segment, e.g. `2023-04`.
    pub api_version: String,

    /// Origin used instead of `https://{shop}` when set.
    /// Intended for proxies and test doubles.
    pub base_url: Option<String>,
}

/// Dropi logistics API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropiConfig {
    /// API origin, e.g. `https://api.dropi.co`.
    pub base_url: String,

    /// Value sent as `Origin` and (with a trailing slash) `Referer`.
    pub origin: Option<String>,
}

/// Deadlines for bounded upstream calls, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Deadline for reads and quick writes.
    pub short_ms: u64,

    /// Deadline for slow operations (order creation, checkout listing).
    pub long_ms: u64,
}

impl TimeoutConfig {
    pub fn short(&self) -> Duration {
        Duration::from_millis(self.short_ms)
    }

    pub fn long(&self) -> Duration {
        Duration::from_millis(self.long_ms)
    }
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            api_version: "2023-04".to_string(),
            base_url: None,
        }
    }
}

impl Default for DropiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dropi.co".to_string(),
            origin: Some("https://app.dropi.co".to_string()),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            short_ms: 10_000,
            long_ms: 50_000,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            shopify: ShopifyConfig::default(),
            dropi: DropiConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "commerce-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_DROPI_BASE_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        if let Ok(version) = std::env::var("MCP_SHOPIFY_API_VERSION") {
            config.upstream.shopify.api_version = version;
        }

        if let Ok(base_url) = std::env::var("MCP_SHOPIFY_BASE_URL") {
            info!("Shopify requests redirected to {}", base_url);
            config.upstream.shopify.base_url = Some(trim_base(&base_url));
        }

        if let Ok(base_url) = std::env::var("MCP_DROPI_BASE_URL") {
            config.upstream.dropi.base_url = trim_base(&base_url);
        }

        if let Ok(origin) = std::env::var("MCP_DROPI_ORIGIN") {
            // An empty value disables the Origin/Referer headers.
            config.upstream.dropi.origin = if origin.is_empty() {
                None
            } else {
                Some(trim_base(&origin))
            };
        }

        if let Some(ms) = read_millis("MCP_SHORT_TIMEOUT_MS") {
            config.upstream.timeouts.short_ms = ms;
        }

        if let Some(ms) = read_millis("MCP_LONG_TIMEOUT_MS") {
            config.upstream.timeouts.long_ms = ms;
        }

        config
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn read_millis(var: &str) -> Option<u64> {
    let raw = std::env::var(var).ok()?;
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => {
            warn!("Ignoring invalid {}={:?}, expected a positive integer", var, raw);
            None
        }
        Ok(ms) => Some(ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.upstream.shopify.api_version, "2023-04");
        assert!(config.upstream.shopify.base_url.is_none());
        assert_eq!(config.upstream.dropi.base_url, "https://api.dropi.co");
        assert_eq!(config.upstream.timeouts.short(), Duration::from_secs(10));
        assert_eq!(config.upstream.timeouts.long(), Duration::from_secs(50));
    }

    #[test]
    fn test_upstream_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SHOPIFY_BASE_URL", "http://127.0.0.1:9999/");
            std::env::set_var("MCP_DROPI_BASE_URL", "http://127.0.0.1:9998");
            std::env::set_var("MCP_SHORT_TIMEOUT_MS", "250");
        }
        let config = Config::from_env();
        assert_eq!(
            config.upstream.shopify.base_url.as_deref(),
            Some("http://127.0.0.1:9999")
        );
        assert_eq!(config.upstream.dropi.base_url, "http://127.0.0.1:9998");
        assert_eq!(config.upstream.timeouts.short_ms, 250);
        unsafe {
            std::env::remove_var("MCP_SHOPIFY_BASE_URL");
            std::env::remove_var("MCP_DROPI_BASE_URL");
            std::env::remove_var("MCP_SHORT_TIMEOUT_MS");
        }
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_LONG_TIMEOUT_MS", "soon");
        }
        let config = Config::from_env();
        assert_eq!(config.upstream.timeouts.long_ms, 50_000);
        unsafe {
            std::env::remove_var("MCP_LONG_TIMEOUT_MS");
        }
    }

    #[test]
    fn test_empty_origin_disables_headers() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_DROPI_ORIGIN", "");
        }
        let config = Config::from_env();
        assert!(config.upstream.dropi.origin.is_none());
        unsafe {
            std::env::remove_var("MCP_DROPI_ORIGIN");
        }
    }
}
