//! Auth state and configuration.

use std::sync::Arc;

use super::provider::IdentityProvider;

/// Routes of the dashboard frontend the service redirects into.
pub(crate) const LOGIN_ROUTE: &str = "/login";
pub(crate) const DEFAULT_LANDING_ROUTE: &str = "/home";
pub(crate) const POST_LOGIN_ROUTE: &str = "/dashboard";
pub(crate) const ONBOARDING_ROUTE: &str = "/role-selection";
pub(crate) const STAFF_ROUTE: &str = "/staff";
pub(crate) const SYNC_ROUTE: &str = "/auth/sync";
pub(crate) const ERROR_ROUTE: &str = "/error";

const DEFAULT_ACCESS_COOKIE_TTL_SECONDS: i64 = 60 * 60;
const DEFAULT_REFRESH_COOKIE_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_OAUTH_STATE_TTL_SECONDS: i64 = 10 * 60;
const DEFAULT_MICROSOFT_AUTHORIZE_URL: &str =
    "https://login.microsoftonline.com/common/oauth2/v2.0/authorize";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    site_base_url: String,
    microsoft_client_id: String,
    microsoft_authorize_url: String,
    access_cookie_ttl_seconds: i64,
    refresh_cookie_ttl_seconds: i64,
    oauth_state_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(site_base_url: String) -> Self {
        Self {
            site_base_url,
            microsoft_client_id: String::new(),
            microsoft_authorize_url: DEFAULT_MICROSOFT_AUTHORIZE_URL.to_string(),
            access_cookie_ttl_seconds: DEFAULT_ACCESS_COOKIE_TTL_SECONDS,
            refresh_cookie_ttl_seconds: DEFAULT_REFRESH_COOKIE_TTL_SECONDS,
            oauth_state_ttl_seconds: DEFAULT_OAUTH_STATE_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_microsoft_client_id(mut self, client_id: String) -> Self {
        self.microsoft_client_id = client_id;
        self
    }

    #[must_use]
    pub fn with_microsoft_authorize_url(mut self, url: String) -> Self {
        self.microsoft_authorize_url = url;
        self
    }

    #[must_use]
    pub fn with_access_cookie_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_cookie_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_cookie_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_cookie_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_oauth_state_ttl_seconds(mut self, seconds: i64) -> Self {
        self.oauth_state_ttl_seconds = seconds;
        self
    }

    pub(crate) fn site_base_url(&self) -> &str {
        &self.site_base_url
    }

    /// Site origin without a trailing slash, used to build absolute redirects.
    pub(crate) fn site_origin(&self) -> &str {
        self.site_base_url.trim_end_matches('/')
    }

    pub(super) fn microsoft_client_id(&self) -> &str {
        &self.microsoft_client_id
    }

    pub(super) fn microsoft_authorize_url(&self) -> &str {
        &self.microsoft_authorize_url
    }

    pub(super) fn access_cookie_ttl_seconds(&self) -> i64 {
        self.access_cookie_ttl_seconds
    }

    pub(super) fn refresh_cookie_ttl_seconds(&self) -> i64 {
        self.refresh_cookie_ttl_seconds
    }

    pub(super) fn oauth_state_ttl_seconds(&self) -> i64 {
        self.oauth_state_ttl_seconds
    }

    pub(super) fn cookie_secure(&self) -> bool {
        self.site_base_url.starts_with("https://")
    }
}

pub struct AuthState {
    config: AuthConfig,
    provider: Arc<dyn IdentityProvider>,
}

impl AuthState {
    pub fn new(config: AuthConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self { config, provider }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn provider(&self) -> &dyn IdentityProvider {
        self.provider.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("https://den.acu.edu".to_string());

        assert_eq!(config.site_base_url(), "https://den.acu.edu");
        assert_eq!(config.microsoft_client_id(), "");
        assert_eq!(
            config.microsoft_authorize_url(),
            super::DEFAULT_MICROSOFT_AUTHORIZE_URL
        );
        assert_eq!(
            config.access_cookie_ttl_seconds(),
            super::DEFAULT_ACCESS_COOKIE_TTL_SECONDS
        );
        assert_eq!(
            config.refresh_cookie_ttl_seconds(),
            super::DEFAULT_REFRESH_COOKIE_TTL_SECONDS
        );
        assert_eq!(
            config.oauth_state_ttl_seconds(),
            super::DEFAULT_OAUTH_STATE_TTL_SECONDS
        );
        assert!(config.cookie_secure());

        let config = config
            .with_microsoft_client_id("client-123".to_string())
            .with_microsoft_authorize_url("https://login.test/authorize".to_string())
            .with_access_cookie_ttl_seconds(120)
            .with_refresh_cookie_ttl_seconds(240)
            .with_oauth_state_ttl_seconds(60);

        assert_eq!(config.microsoft_client_id(), "client-123");
        assert_eq!(config.microsoft_authorize_url(), "https://login.test/authorize");
        assert_eq!(config.access_cookie_ttl_seconds(), 120);
        assert_eq!(config.refresh_cookie_ttl_seconds(), 240);
        assert_eq!(config.oauth_state_ttl_seconds(), 60);
    }

    #[test]
    fn site_origin_trims_trailing_slash() {
        let config = AuthConfig::new("https://den.acu.edu/".to_string());
        assert_eq!(config.site_origin(), "https://den.acu.edu");
    }

    #[test]
    fn cookie_secure_only_for_https() {
        let config = AuthConfig::new("http://localhost:3000".to_string());
        assert!(!config.cookie_secure());
    }
}
