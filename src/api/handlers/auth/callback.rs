//! Auth callback resolver.
//!
//! Exchanges exactly one of two credential forms for a provider session:
//! an authorization code, or a one-time token from email verification /
//! magic-link flows. Every outcome is a single redirect.

use axum::{
    extract::{Extension, Query},
    http::{header::SET_COOKIE, HeaderMap},
    response::Response,
};
use std::sync::Arc;
use tracing::error;

use super::{
    session::session_cookies,
    state::{AuthState, POST_LOGIN_ROUTE},
    types::CallbackParams,
    utils::{error_redirect, found_with_headers, sanitize_redirect_target, INVALID_CALLBACK_MESSAGE},
};

/// The two credential forms a callback can carry, dispatched on which fields
/// are present. An authorization code wins if a confused client sends both.
#[derive(Debug)]
pub(super) enum CallbackCredentials {
    AuthorizationCode { code: String },
    EmailToken { token_hash: String, otp_type: String },
}

impl CallbackCredentials {
    pub(super) fn classify(params: &CallbackParams) -> Option<Self> {
        if let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) {
            return Some(Self::AuthorizationCode {
                code: code.to_string(),
            });
        }
        match (params.token_hash.as_deref(), params.otp_type.as_deref()) {
            (Some(token_hash), Some(otp_type)) if !token_hash.is_empty() && !otp_type.is_empty() => {
                Some(Self::EmailToken {
                    token_hash: token_hash.to_string(),
                    otp_type: otp_type.to_string(),
                })
            }
            _ => None,
        }
    }
}

#[utoipa::path(
    get,
    path = "/auth/callback",
    params(
        ("code" = Option<String>, Query, description = "One-time authorization code"),
        ("token_hash" = Option<String>, Query, description = "One-time email token hash"),
        ("type" = Option<String>, Query, description = "Email token type"),
        ("next" = Option<String>, Query, description = "Relative post-login destination"),
        ("error" = Option<String>, Query, description = "Provider-reported error")
    ),
    responses(
        (status = 302, description = "Redirect to the destination or the error page")
    ),
    tag = "auth"
)]
pub async fn callback(
    auth_state: Extension<Arc<AuthState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let config = auth_state.config();

    // A provider-reported error short-circuits; no exchange is attempted.
    if let Some(provider_error) = params.error.as_deref() {
        let message = params
            .error_description
            .as_deref()
            .unwrap_or(provider_error);
        error!("Provider reported callback error: {message}");
        return error_redirect(config, message);
    }

    let Some(credentials) = CallbackCredentials::classify(&params) else {
        return error_redirect(config, INVALID_CALLBACK_MESSAGE);
    };

    let destination = sanitize_redirect_target(
        params.next.as_deref().or(params.redirect_to.as_deref()),
        POST_LOGIN_ROUTE,
    );

    let session = match credentials {
        CallbackCredentials::AuthorizationCode { code } => {
            auth_state.provider().exchange_code(&code).await
        }
        CallbackCredentials::EmailToken {
            token_hash,
            otp_type,
        } => auth_state.provider().verify_otp(&token_hash, &otp_type).await,
    };

    match session {
        Ok(session) => {
            let mut headers = HeaderMap::new();
            match session_cookies(config, &session) {
                Ok(cookies) => {
                    for cookie in cookies {
                        headers.append(SET_COOKIE, cookie);
                    }
                }
                Err(err) => {
                    error!("Failed to build session cookies: {err}");
                    return error_redirect(config, "Authentication failed");
                }
            }
            found_with_headers(
                &format!("{}{destination}", config.site_origin()),
                headers,
            )
        }
        Err(err) => {
            error!("Credential exchange failed: {err}");
            error_redirect(config, &err.to_string())
        }
    }
}
