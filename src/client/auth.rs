//! Authentication handling for the OpenPlantbook API.
//!
//! This module manages OAuth2 client-credentials authentication against the
//! OpenPlantbook token endpoint. Tokens are cached with their absolute
//! expiry and reused until fewer than five minutes of validity remain.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::client::types::{TokenRequest, TokenResponse};
use crate::error::{Error, Result};

/// Minutes of remaining validity below which a cached token is replaced.
const TOKEN_REFRESH_MARGIN_MINUTES: i64 = 5;

/// A cached bearer token with its absolute expiry.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now + Duration::minutes(TOKEN_REFRESH_MARGIN_MINUTES)
    }
}

/// # OpenPlantbook Authentication Handler
///
/// Manages OAuth2 client-credentials authentication for OpenPlantbook API
/// access.
///
/// ## Token Caching
///
/// The token endpoint issues short-lived bearer tokens. This handler caches
/// the token together with its expiry and only performs a new exchange when
/// the cached token has less than five minutes of validity left. The cache
/// sits behind an async mutex that is held across both the freshness check
/// and the exchange, so concurrent first calls on one client perform exactly
/// one token request.
pub struct PlantbookAuth {
    /// Base URL of the OpenPlantbook API
    base_url: String,
    /// HTTP client for token requests
    client: Client,
    /// OAuth client ID from the OpenPlantbook UI
    client_id: String,
    /// OAuth client secret from the OpenPlantbook UI
    secret: String,
    /// Cached bearer token, if any
    token: Mutex<Option<CachedToken>>,
}

impl PlantbookAuth {
    pub fn new(base_url: String, client_id: String, secret: String) -> Self {
        Self {
            base_url,
            client: Client::new(),
            client_id,
            secret,
            token: Mutex::new(None),
        }
    }

    /// Return a bearer token with at least five minutes of validity,
    /// performing a token exchange if the cache is empty or stale.
    ///
    /// Fails with [`Error::MissingCredentials`] before any network call when
    /// the client id or secret is empty.
    pub async fn access_token(&self) -> Result<String> {
        if self.client_id.is_empty() || self.secret.is_empty() {
            return Err(Error::MissingCredentials);
        }

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                tracing::debug!("Token is still valid");
                return Ok(token.access_token.clone());
            }
        }

        let token = self.exchange_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn exchange_token(&self) -> Result<CachedToken> {
        let token_url = format!("{}/token/", self.base_url);
        tracing::debug!("Requesting token from: {}", token_url);

        let request = TokenRequest {
            grant_type: "client_credentials",
            client_id: &self.client_id,
            client_secret: &self.secret,
        };

        let response = self
            .client
            .post(&token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error during token exchange: {}", e);
                Error::Http(e)
            })?;

        let status = response.status();
        tracing::debug!("Token exchange response status: {}", status);

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::error!("Token exchange failed with status {}: {}", status, error_body);

            return match status.as_u16() {
                400 | 401 | 403 => Err(Error::InvalidCredentials),
                _ => Err(Error::api(status.as_u16(), error_body)),
            };
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse token response: {}", e);
            Error::Http(e)
        })?;

        let access_token = match token.access_token {
            Some(t) if !t.is_empty() => t,
            _ => {
                tracing::error!("Wrong client id or secret");
                return Err(Error::InvalidCredentials);
            }
        };

        tracing::debug!("Got token from {}", token_url);
        Ok(CachedToken {
            access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }

    /// Seed the token cache with a token obtained out-of-band.
    pub async fn set_token(&self, access_token: String, expires_at: DateTime<Utc>) {
        let mut cached = self.token.lock().await;
        *cached = Some(CachedToken {
            access_token,
            expires_at,
        });
    }

    /// Whether a cached token with enough remaining validity is present.
    pub async fn is_authenticated(&self) -> bool {
        let cached = self.token.lock().await;
        cached
            .as_ref()
            .map(|t| t.is_fresh(Utc::now()))
            .unwrap_or(false)
    }
}
