//! Managed identity provider client.
//!
//! The provider owns credential validity and the session itself. This client
//! only exchanges credentials and fetches the user behind an access token;
//! exchange failures are surfaced once and never retried.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use crate::APP_USER_AGENT;

/// Opaque token pair issued by the provider. Never parsed, only forwarded.
#[derive(Clone, Debug, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<i64>,
}

/// Identity of the user behind a valid access token.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange a one-time authorization code for a session.
    async fn exchange_code(&self, code: &str) -> Result<ProviderSession>;

    /// Verify a one-time token (email verification / magic link) for a session.
    async fn verify_otp(&self, token_hash: &str, otp_type: &str) -> Result<ProviderSession>;

    /// Resolve the user behind an access token. `Ok(None)` means the token is
    /// not (or no longer) valid.
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>>;
}

/// GoTrue-style HTTP client for the managed auth provider.
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpIdentityProvider {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: String, api_key: SecretString) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build provider HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn session_from_response(response: reqwest::Response) -> Result<ProviderSession> {
        if response.status().is_success() {
            return response
                .json::<ProviderSession>()
                .await
                .context("Invalid session payload from provider");
        }
        let message = provider_error_message(response).await;
        bail!("{message}")
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn exchange_code(&self, code: &str) -> Result<ProviderSession> {
        let url = format!(
            "{}/auth/v1/token?grant_type=authorization_code",
            self.base_url
        );
        let response = self
            .http
            .post(&url)
            .header("apikey", self.api_key.expose_secret())
            .json(&serde_json::json!({ "auth_code": code }))
            .send()
            .await
            .context("Provider code exchange request failed")?;

        Self::session_from_response(response).await
    }

    async fn verify_otp(&self, token_hash: &str, otp_type: &str) -> Result<ProviderSession> {
        let url = format!("{}/auth/v1/verify", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", self.api_key.expose_secret())
            .json(&serde_json::json!({ "token_hash": token_hash, "type": otp_type }))
            .send()
            .await
            .context("Provider token verification request failed")?;

        Self::session_from_response(response).await
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(access_token)
            .send()
            .await
            .context("Provider user lookup request failed")?;

        if response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::FORBIDDEN
        {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            bail!("Provider user lookup failed with status {status}")
        }

        let user = response
            .json::<AuthUser>()
            .await
            .context("Invalid user payload from provider")?;
        Ok(Some(user))
    }
}

/// Pull the human-readable message out of a provider error payload.
async fn provider_error_message(response: reqwest::Response) -> String {
    #[derive(Deserialize)]
    struct ProviderError {
        error_description: Option<String>,
        msg: Option<String>,
        error: Option<String>,
    }

    match response.json::<ProviderError>().await {
        Ok(body) => body
            .error_description
            .or(body.msg)
            .or(body.error)
            .unwrap_or_else(|| "Authentication failed".to_string()),
        Err(_) => "Authentication failed".to_string(),
    }
}
