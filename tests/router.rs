//! In-process router tests.
//!
//! These drive the full route table through `tower::ServiceExt::oneshot`
//! without binding a socket. The identity provider points at an unroutable
//! address and the pool is lazy, so only flows that never reach the provider
//! or the database (plus the fail-closed paths when they are unreachable)
//! are exercised here.

use anyhow::Result;
use axum::{
    body::Body,
    extract::Extension,
    http::{
        header::{COOKIE, LOCATION, SET_COOKIE},
        Method, Request, StatusCode,
    },
    Router,
};
use den::api::{app, AuthConfig, AuthState, HttpIdentityProvider};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Result<Router> {
    let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@127.0.0.1:1/den")?;
    let provider = HttpIdentityProvider::new(
        "http://127.0.0.1:1".to_string(),
        SecretString::from("service-role-key".to_string()),
    )?;
    let config = AuthConfig::new("https://den.acu.edu".to_string())
        .with_microsoft_client_id("client-123".to_string());
    let state = Arc::new(AuthState::new(config, Arc::new(provider)));

    Ok(app().layer(Extension(state)).layer(Extension(pool)))
}

async fn get(app: Router, uri: &str) -> Result<axum::response::Response> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    Ok(app.oneshot(request).await?)
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn root_without_session_redirects_to_login() -> Result<()> {
    let response = get(test_app()?, "/").await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://den.acu.edu/login");

    Ok(())
}

#[tokio::test]
async fn root_with_unverifiable_session_redirects_to_login() -> Result<()> {
    let request = Request::builder()
        .uri("/")
        .header(COOKIE, "den_access_token=stale-token")
        .body(Body::empty())?;
    let response = test_app()?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://den.acu.edu/login");

    Ok(())
}

#[tokio::test]
async fn callback_without_credentials_redirects_to_error_page() -> Result<()> {
    let response = get(test_app()?, "/auth/callback").await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://den.acu.edu/error?message=Invalid%20authentication%20callback"
    );

    Ok(())
}

#[tokio::test]
async fn callback_with_provider_error_forwards_description() -> Result<()> {
    let response = get(
        test_app()?,
        "/auth/callback?error=access_denied&error_description=User%20declined",
    )
    .await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://den.acu.edu/error?message=User%20declined"
    );

    Ok(())
}

#[tokio::test]
async fn microsoft_login_redirects_to_authorize_endpoint() -> Result<()> {
    let response = get(test_app()?, "/api/auth/microsoft/login").await?;

    assert_eq!(response.status(), StatusCode::FOUND);

    let location = location(&response).to_string();
    assert!(location.starts_with("https://login.microsoftonline.com/common/oauth2/v2.0/authorize?"));
    assert!(location.contains("client_id=client-123"));
    assert!(location.contains("redirect_uri=https%3A%2F%2Fden.acu.edu%2Fapi%2Fauth%2Fmicrosoft%2Fcallback"));

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("oauth_redirect="));

    Ok(())
}

#[tokio::test]
async fn microsoft_callback_without_state_redirects_to_error_page() -> Result<()> {
    let response = get(test_app()?, "/api/auth/microsoft/callback?code=abc").await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://den.acu.edu/error?message=Invalid%20authentication%20callback"
    );

    Ok(())
}

#[tokio::test]
async fn role_without_session_returns_no_content() -> Result<()> {
    let response = get(test_app()?, "/v1/auth/role").await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn health_preflight_returns_no_content() -> Result<()> {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/health")
        .body(Body::empty())?;
    let response = test_app()?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    Ok(())
}
