//! Microsoft OAuth relay.
//!
//! Login initiation stores the intended destination in the single-use
//! `oauth_redirect` cookie and hands off to the provider; the callback
//! classifies the provider's answer and forwards to the frontend sync page.
//! The relay never mutates session state.

use axum::{
    extract::{Extension, Query},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use super::{
    session::build_cookie,
    state::{AuthState, DEFAULT_LANDING_ROUTE, SYNC_ROUTE},
    types::{RelayCallbackParams, RelayLoginParams},
    utils::{
        error_redirect, extract_cookie, found_with_headers, generate_oauth_state,
        sanitize_redirect_target, INVALID_CALLBACK_MESSAGE,
    },
};

pub(crate) const OAUTH_REDIRECT_COOKIE: &str = "oauth_redirect";

#[utoipa::path(
    get,
    path = "/api/auth/microsoft/login",
    params(
        ("redirect_to" = Option<String>, Query, description = "Relative destination after login")
    ),
    responses(
        (status = 302, description = "Redirect to the Microsoft authorize endpoint")
    ),
    tag = "auth"
)]
pub async fn microsoft_login(
    auth_state: Extension<Arc<AuthState>>,
    Query(params): Query<RelayLoginParams>,
) -> Response {
    let config = auth_state.config();

    let state = generate_oauth_state();
    let destination =
        sanitize_redirect_target(params.redirect_to.as_deref(), DEFAULT_LANDING_ROUTE);

    let mut headers = HeaderMap::new();
    match build_cookie(
        OAUTH_REDIRECT_COOKIE,
        &destination,
        config.oauth_state_ttl_seconds(),
        config.cookie_secure(),
    ) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build oauth_redirect cookie: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("client_id", config.microsoft_client_id())
        .append_pair("response_type", "code")
        .append_pair(
            "redirect_uri",
            &format!("{}/api/auth/microsoft/callback", config.site_origin()),
        )
        .append_pair("scope", "openid profile email")
        .append_pair("state", &state);

    let location = format!("{}?{}", config.microsoft_authorize_url(), query.finish());
    found_with_headers(&location, headers)
}

#[utoipa::path(
    get,
    path = "/api/auth/microsoft/callback",
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("state" = Option<String>, Query, description = "Correlation value from login initiation"),
        ("error" = Option<String>, Query, description = "Provider-reported error")
    ),
    responses(
        (status = 302, description = "Redirect to the sync page or the error page")
    ),
    tag = "auth"
)]
pub async fn microsoft_callback(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    Query(params): Query<RelayCallbackParams>,
) -> Response {
    let config = auth_state.config();

    if let Some(provider_error) = params.error.as_deref() {
        let message = params
            .error_description
            .as_deref()
            .unwrap_or(provider_error);
        error!("Microsoft relay received callback error: {message}");
        return error_redirect(config, message);
    }

    let (Some(code), Some(state)) = (
        params.code.as_deref().filter(|c| !c.is_empty()),
        params.state.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return error_redirect(config, INVALID_CALLBACK_MESSAGE);
    };

    // The destination cookie is UX context, not a security boundary; it is
    // still sanitized and consumed exactly once.
    let destination = sanitize_redirect_target(
        extract_cookie(&headers, OAUTH_REDIRECT_COOKIE).as_deref(),
        DEFAULT_LANDING_ROUTE,
    );

    let mut response_headers = HeaderMap::new();
    if let Ok(expired) = build_cookie(OAUTH_REDIRECT_COOKIE, "", 0, config.cookie_secure()) {
        response_headers.insert(SET_COOKIE, expired);
    }

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("code", code)
        .append_pair("state", state)
        .append_pair("redirectTo", &destination);

    let location = format!(
        "{}{}?{}",
        config.site_origin(),
        SYNC_ROUTE,
        query.finish()
    );
    found_with_headers(&location, response_headers)
}
