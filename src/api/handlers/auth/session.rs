//! Session cookie forwarding for the provider-issued token pair.
//!
//! The service never parses or mutates the tokens; it only moves them between
//! the provider and `HttpOnly` cookies.

use axum::{
    http::{
        header::{InvalidHeaderValue, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::error;

use super::{
    provider::ProviderSession,
    state::{AuthConfig, AuthState},
    utils::extract_cookie,
};

pub(crate) const ACCESS_COOKIE_NAME: &str = "den_access_token";
pub(crate) const REFRESH_COOKIE_NAME: &str = "den_refresh_token";

/// Build the `Set-Cookie` pair for a freshly established session.
pub(super) fn session_cookies(
    config: &AuthConfig,
    session: &ProviderSession,
) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    // The provider reports the access token lifetime; fall back to config.
    let access_ttl = session
        .expires_in
        .unwrap_or_else(|| config.access_cookie_ttl_seconds());

    Ok(vec![
        build_cookie(
            ACCESS_COOKIE_NAME,
            &session.access_token,
            access_ttl,
            config.cookie_secure(),
        )?,
        build_cookie(
            REFRESH_COOKIE_NAME,
            &session.refresh_token,
            config.refresh_cookie_ttl_seconds(),
            config.cookie_secure(),
        )?,
    ])
}

/// Expire both session cookies.
pub(super) fn clear_session_cookies(config: &AuthConfig) -> Vec<HeaderValue> {
    [ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME]
        .iter()
        .filter_map(|name| build_cookie(name, "", 0, config.cookie_secure()).ok())
        .collect()
}

pub(super) fn build_cookie(
    name: &str,
    value: &str,
    max_age: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Read the forwarded access token, if the request carries one.
pub(crate) fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie(headers, ACCESS_COOKIE_NAME).filter(|token| !token.is_empty())
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 204, description = "Session cookies cleared")
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: axum::extract::Extension<Arc<AuthState>>) -> impl IntoResponse {
    // The provider owns the session records; clearing the cookies is all the
    // destruction this service performs.
    let mut response_headers = HeaderMap::new();
    for cookie in clear_session_cookies(auth_state.config()) {
        response_headers.append(SET_COOKIE, cookie);
    }
    if response_headers.is_empty() {
        error!("Failed to build session clearing cookies");
    }
    (StatusCode::NO_CONTENT, response_headers).into_response()
}
