use clap::Parser;
use std::path::PathBuf;

use descry_core::config::{DEFAULT_BASE_URL, DEFAULT_PARALLELISM, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "descry",
    version,
    about = "Validate YAML entity descriptors against the remote catalog before merge"
)]
pub struct Cli {
    /// Descriptor files or directories to validate (defaults to the current directory)
    pub paths: Vec<PathBuf>,

    /// Catalog API base URL
    #[arg(long, env = "DESCRY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Catalog client id
    #[arg(long, env = "DESCRY_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Catalog client secret
    #[arg(long, env = "DESCRY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "DESCRY_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Number of files validated concurrently
    #[arg(long, env = "DESCRY_PARALLELISM", default_value_t = DEFAULT_PARALLELISM)]
    pub parallel: usize,
}

impl Cli {
    pub fn to_config(&self) -> descry_core::CatalogConfig {
        descry_core::CatalogConfig::default()
            .with_base_url(&self.base_url)
            .with_client_id(self.client_id.clone().unwrap_or_default())
            .with_client_secret(self.client_secret.clone().unwrap_or_default())
            .with_timeout_secs(self.timeout)
            .with_parallelism(self.parallel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // The flags are env-backed, so an ambient DESCRY_* in the developer's
    // shell would leak into parse_from.
    fn clear_env() {
        std::env::remove_var("DESCRY_BASE_URL");
        std::env::remove_var("DESCRY_CLIENT_ID");
        std::env::remove_var("DESCRY_CLIENT_SECRET");
        std::env::remove_var("DESCRY_TIMEOUT");
        std::env::remove_var("DESCRY_PARALLELISM");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let cli = Cli::parse_from(["descry"]);
        assert!(cli.paths.is_empty());
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert_eq!(cli.timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cli.parallel, DEFAULT_PARALLELISM);
    }

    #[test]
    #[serial]
    fn test_env_feeds_flags() {
        clear_env();

        std::env::set_var("DESCRY_BASE_URL", "https://catalog.example/v2");
        std::env::set_var("DESCRY_CLIENT_ID", "env-id");
        let cli = Cli::parse_from(["descry"]);
        clear_env();

        assert_eq!(cli.base_url, "https://catalog.example/v2");
        assert_eq!(cli.client_id.as_deref(), Some("env-id"));
    }

    #[test]
    #[serial]
    fn test_paths_and_flags() {
        clear_env();

        let cli = Cli::parse_from([
            "descry",
            "descriptors/",
            "svc.yaml",
            "--base-url",
            "https://catalog.example/v1",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--parallel",
            "2",
        ]);
        assert_eq!(cli.paths.len(), 2);

        let config = cli.to_config();
        assert_eq!(config.base_url, "https://catalog.example/v1");
        assert_eq!(config.parallelism, 2);
        assert!(config.validate().is_ok());
    }
}
