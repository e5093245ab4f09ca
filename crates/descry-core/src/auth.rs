//! Bearer-token credential management.
//!
//! The catalog issues short-lived access tokens via
//! `POST /auth/access_token`. [`TokenManager`] owns the cached token and its
//! expiry instant, refreshing on demand with a 60-second buffer before
//! expiry. The cached slot is guarded by a `tokio::sync::Mutex` held across
//! the refresh request, so concurrent validation tasks that all observe a
//! stale token queue behind one refresh instead of issuing duplicates.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};

/// Seconds before expiry at which a token is treated as stale.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Lifetime assumed when the auth response omits `expiresIn`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Owns the access token and its refresh lifecycle.
#[derive(Debug, Clone)]
pub struct TokenManager {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    slot: Arc<Mutex<Option<CachedToken>>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// A token is stale once `now + buffer` reaches its expiry.
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(EXPIRY_BUFFER_SECS) < self.expires_at
    }
}

/// Response from the access-token endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenManager {
    /// Create a manager for the given catalog.
    ///
    /// `base_url` must already be normalized (no trailing slash).
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: format!("{}/auth/access_token", base_url),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Return a usable bearer token, refreshing first if the cached one is
    /// absent or within the expiry buffer.
    pub async fn bearer_token(&self) -> CatalogResult<String> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.is_fresh(Utc::now()) {
                debug!("using cached access token");
                return Ok(cached.token.clone());
            }
        }

        // Lock is held across the request: at most one refresh in flight.
        let cached = self.refresh().await?;
        let token = cached.token.clone();
        *slot = Some(cached);
        Ok(token)
    }

    /// Perform one refresh request. No retry: a failure here is fatal to the
    /// whole run since no task can proceed without a token.
    async fn refresh(&self) -> CatalogResult<CachedToken> {
        debug!(url = %self.token_url, "refreshing access token");

        let response = self
            .http
            .post(&self.token_url)
            .json(&serde_json::json!({
                "clientId": self.client_id,
                "clientSecret": self.client_secret,
            }))
            .send()
            .await
            .map_err(|e| CatalogError::Auth {
                message: format!("token request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Auth {
                message: format!("token request failed: HTTP {} - {}", status.as_u16(), body),
            });
        }

        let body: AccessTokenResponse =
            response.json().await.map_err(|e| CatalogError::Auth {
                message: format!("failed to parse token response: {}", e),
            })?;

        let token = match body.access_token {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(CatalogError::Auth {
                    message: "access token missing from response".into(),
                })
            }
        };

        let expires_in = body.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let expires_at = Utc::now() + chrono::Duration::seconds(expires_in);

        debug!(expires_in, "obtained access token");

        Ok(CachedToken { token, expires_at })
    }
}
