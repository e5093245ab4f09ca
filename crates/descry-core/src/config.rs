//! Configuration for the catalog client.

use crate::error::{CatalogError, CatalogResult};

/// Default catalog API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.getport.io/v1";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of files validated concurrently.
pub const DEFAULT_PARALLELISM: usize = 8;

/// Catalog connection and run configuration.
///
/// Built from the environment (`DESCRY_*` variables) or via the builder
/// methods. `client_id` and `client_secret` are mandatory; [`validate`]
/// rejects a config without them before any network activity.
///
/// [`validate`]: CatalogConfig::validate
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog API base URL.
    pub base_url: String,

    /// OAuth-style client id.
    pub client_id: String,

    /// OAuth-style client secret.
    pub client_secret: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum number of files validated concurrently.
    pub parallelism: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl CatalogConfig {
    /// Create a config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `DESCRY_BASE_URL` | Catalog base URL (default: `https://api.getport.io/v1`) |
    /// | `DESCRY_CLIENT_ID` | Client id (required) |
    /// | `DESCRY_CLIENT_SECRET` | Client secret (required) |
    /// | `DESCRY_TIMEOUT` | Request timeout in seconds (default: 30) |
    /// | `DESCRY_PARALLELISM` | Concurrent file validations (default: 8) |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("DESCRY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            client_id: std::env::var("DESCRY_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("DESCRY_CLIENT_SECRET").unwrap_or_default(),
            timeout_secs: std::env::var("DESCRY_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            parallelism: std::env::var("DESCRY_PARALLELISM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PARALLELISM),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the client id.
    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    /// Set the client secret.
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = secret.into();
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the concurrency bound.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Check that the credentials needed for any catalog call are present.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.client_id.is_empty() {
            return Err(CatalogError::Config {
                message: "client id not set (DESCRY_CLIENT_ID or --client-id)".into(),
            });
        }
        if self.client_secret.is_empty() {
            return Err(CatalogError::Config {
                message: "client secret not set (DESCRY_CLIENT_SECRET or --client-secret)".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("DESCRY_BASE_URL");
        std::env::remove_var("DESCRY_CLIENT_ID");
        std::env::remove_var("DESCRY_CLIENT_SECRET");
        std::env::remove_var("DESCRY_TIMEOUT");
        std::env::remove_var("DESCRY_PARALLELISM");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = CatalogConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.client_id.is_empty());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.parallelism, DEFAULT_PARALLELISM);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();

        std::env::set_var("DESCRY_BASE_URL", "https://catalog.example/v2");
        std::env::set_var("DESCRY_CLIENT_ID", "id-123");
        std::env::set_var("DESCRY_CLIENT_SECRET", "secret-456");
        std::env::set_var("DESCRY_TIMEOUT", "5");
        let config = CatalogConfig::from_env();
        clear_env();

        assert_eq!(config.base_url, "https://catalog.example/v2");
        assert_eq!(config.client_id, "id-123");
        assert_eq!(config.client_secret, "secret-456");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let config = CatalogConfig::default();
        assert!(matches!(
            config.validate(),
            Err(CatalogError::Config { .. })
        ));

        let config = CatalogConfig::default().with_client_id("id");
        assert!(matches!(
            config.validate(),
            Err(CatalogError::Config { .. })
        ));

        let config = CatalogConfig::default()
            .with_client_id("id")
            .with_client_secret("secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = CatalogConfig::default()
            .with_base_url("https://catalog.example/v1")
            .with_client_id("id")
            .with_client_secret("secret")
            .with_timeout_secs(10)
            .with_parallelism(2);

        assert_eq!(config.base_url, "https://catalog.example/v1");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.parallelism, 2);
    }
}
