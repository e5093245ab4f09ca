//! HTTP client for the remote catalog.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tracing::debug;

use crate::auth::TokenManager;
use crate::config::CatalogConfig;
use crate::descriptor::Descriptor;
use crate::error::{CatalogError, CatalogResult};

/// User agent for catalog requests.
const USER_AGENT_VALUE: &str = concat!("descry/", env!("CARGO_PKG_VERSION"));

/// Catalog client shared by all validation tasks.
///
/// Holds one `reqwest::Client` (safe for concurrent use) and the
/// [`TokenManager`]; every request carries a bearer token obtained through
/// the manager, which refreshes expiry-aware.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    tokens: TokenManager,
}

impl CatalogClient {
    /// Create a client from a validated configuration.
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| CatalogError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let tokens = TokenManager::new(
            client.clone(),
            &base_url,
            config.client_id.clone(),
            config.client_secret.clone(),
        );

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    /// Obtain a token eagerly, so an auth failure aborts before fan-out.
    pub async fn warm_token(&self) -> CatalogResult<()> {
        self.tokens.bearer_token().await.map(|_| ())
    }

    /// Fetch a blueprint's required-field names.
    ///
    /// The catalog reports them at `blueprint.schema.required`; a missing or
    /// empty collection means the blueprint has no required fields.
    pub async fn required_fields(&self, blueprint: &str) -> CatalogResult<Vec<String>> {
        let url = format!("{}/blueprints/{}", self.base_url, blueprint);
        debug!(url = %url, "fetching blueprint schema");

        let response = self.authed(self.client.get(&url)).await?.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Network {
                message: format!(
                    "blueprint '{}' fetch failed: HTTP {}",
                    blueprint,
                    status.as_u16()
                ),
            });
        }

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| CatalogError::InvalidResponse {
                    message: format!("failed to parse blueprint response: {}", e),
                })?;

        let required = body
            .pointer("/blueprint/schema/required")
            .and_then(|v| v.as_array())
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|f| f.as_str())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(required)
    }

    /// Check whether an entity already exists in the catalog.
    ///
    /// Any 2xx status means it exists; every other status (404 included) is
    /// treated as absence. Transport failures propagate.
    pub async fn entity_exists(&self, identifier: &str, blueprint: &str) -> CatalogResult<bool> {
        let url = format!(
            "{}/blueprints/{}/entities/{}",
            self.base_url, blueprint, identifier
        );
        debug!(url = %url, "checking entity existence");

        let response = self.authed(self.client.get(&url)).await?.send().await?;
        Ok(response.status().is_success())
    }

    /// Submit the full descriptor to the catalog's validation-only endpoint.
    ///
    /// Legacy path retained for compatibility; returns the validity flag and
    /// the response body for diagnostics.
    pub async fn validate_entity(
        &self,
        descriptor: &Descriptor,
    ) -> CatalogResult<(bool, serde_json::Value)> {
        let url = format!("{}/entities?validation_only=true", self.base_url);
        debug!(url = %url, identifier = %descriptor.identifier, "validating entity remotely");

        let response = self
            .authed(self.client.post(&url))
            .await?
            .json(&descriptor.to_payload())
            .send()
            .await?;

        let valid = response.status().is_success();
        let body = response
            .json()
            .await
            .unwrap_or(serde_json::Value::Null);

        Ok((valid, body))
    }

    async fn authed(
        &self,
        request: reqwest::RequestBuilder,
    ) -> CatalogResult<reqwest::RequestBuilder> {
        let token = self.tokens.bearer_token().await?;
        Ok(request.header(AUTHORIZATION, format!("Bearer {}", token)))
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
