//! Redirect helpers shared by the relay, the callback resolver, and the role
//! router.

use axum::{
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};
use uuid::Uuid;

use super::state::{AuthConfig, ERROR_ROUTE};

pub(super) const INVALID_CALLBACK_MESSAGE: &str = "Invalid authentication callback";

/// Coerce an externally supplied redirect target to a relative path.
///
/// Anything that is not a plain `/path` (absolute URLs, protocol-relative
/// `//host`, backslash tricks) is replaced with the fallback. The target only
/// affects UX, never authorization, but it must not become an open redirect.
pub(crate) fn sanitize_redirect_target(candidate: Option<&str>, fallback: &'static str) -> String {
    let Some(candidate) = candidate.map(str::trim).filter(|c| !c.is_empty()) else {
        return fallback.to_string();
    };

    let safe = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.starts_with("/\\");

    if safe {
        candidate.to_string()
    } else {
        warn!("Rejected unsafe redirect target {candidate:?}");
        fallback.to_string()
    }
}

/// Percent-encode a query value.
///
/// `byte_serialize` emits form encoding (`+` for spaces); the frontend error
/// page expects `%20`, and literal `+` in the input is already escaped.
pub(super) fn url_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// 302 redirect, the only response shape this flow ever produces.
pub(crate) fn found(location: &str) -> Response {
    found_with_headers(location, HeaderMap::new())
}

/// 302 redirect carrying extra response headers (cookies).
pub(crate) fn found_with_headers(location: &str, mut headers: HeaderMap) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            headers.insert(LOCATION, value);
            (StatusCode::FOUND, headers).into_response()
        }
        Err(err) => {
            error!("Invalid redirect location {location:?}: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Redirect to the frontend error page with a URL-encoded message.
pub(super) fn error_redirect(config: &AuthConfig, message: &str) -> Response {
    let location = format!(
        "{}{}?message={}",
        config.site_origin(),
        ERROR_ROUTE,
        url_encode(message)
    );
    found(&location)
}

/// Correlation value for a new login attempt. Uniqueness is what matters here;
/// replay protection lives with the provider's own state validation.
pub(super) fn generate_oauth_state() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Parse a named cookie out of the request headers.
pub(crate) fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}
