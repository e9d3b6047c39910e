//! Role router: the post-login decision procedure for the application root.
//!
//! Every visit to `/` resolves to exactly one redirect. The profile lookup
//! fails open to the default landing route; a broken profiles table must
//! never lock users out of the dashboard (the landing route still enforces
//! its own authorization server-side).

use axum::{extract::Extension, http::HeaderMap, response::Response};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::auth::{
    session,
    state::{AuthState, DEFAULT_LANDING_ROUTE, LOGIN_ROUTE, ONBOARDING_ROUTE, STAFF_ROUTE},
    storage::{lookup_profile, UserProfile},
    utils::found,
};

/// Decision table over the persisted profile. Onboarding takes precedence
/// over role.
pub(crate) fn route_for_profile(profile: &UserProfile) -> &'static str {
    if !profile.has_completed_onboarding {
        return ONBOARDING_ROUTE;
    }
    if profile.role.is_staff_level() {
        STAFF_ROUTE
    } else {
        DEFAULT_LANDING_ROUTE
    }
}

// axum handler for the application root
pub async fn root(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    let config = auth_state.config();
    let redirect = |route: &str| found(&format!("{}{route}", config.site_origin()));

    let Some(token) = session::extract_access_token(&headers) else {
        return redirect(LOGIN_ROUTE);
    };

    let user = match auth_state.provider().get_user(&token).await {
        Ok(Some(user)) => user,
        Ok(None) => return redirect(LOGIN_ROUTE),
        Err(err) => {
            // A provider outage means the session cannot be verified; treat
            // it as unauthenticated rather than failing the request.
            error!("Failed to resolve session user: {err}");
            return redirect(LOGIN_ROUTE);
        }
    };

    let route = match lookup_profile(&pool, user.id).await {
        Ok(Some(profile)) => {
            debug!(
                "Routing user {} with role {}",
                profile.user_id, profile.role
            );
            route_for_profile(&profile)
        }
        Ok(None) => {
            warn!("No profile for user {}, using default landing", user.id);
            DEFAULT_LANDING_ROUTE
        }
        Err(err) => {
            error!("Profile lookup failed, failing open: {err}");
            DEFAULT_LANDING_ROUTE
        }
    };

    redirect(route)
}

#[cfg(test)]
mod tests {
    use super::super::auth::provider::testing::MockProvider;
    use super::super::auth::{AuthConfig, Role};
    use super::*;
    use axum::http::{
        header::{COOKIE, LOCATION},
        HeaderValue, StatusCode,
    };
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    fn profile(role: Role, has_completed_onboarding: bool) -> UserProfile {
        UserProfile {
            user_id: Uuid::nil(),
            role,
            has_completed_onboarding,
        }
    }

    fn lazy_pool() -> PgPool {
        // Nothing listens here; any query fails, exercising the fail-open path.
        PgPoolOptions::new()
            .connect_lazy("postgres://postgres@127.0.0.1:1/den")
            .unwrap()
    }

    fn auth_state(provider: Arc<MockProvider>) -> Arc<AuthState> {
        Arc::new(AuthState::new(
            AuthConfig::new("https://den.acu.edu".to_string()),
            provider,
        ))
    }

    fn location(response: &Response) -> String {
        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn onboarding_takes_precedence_over_role() {
        assert_eq!(
            route_for_profile(&profile(Role::Admin, false)),
            "/role-selection"
        );
        assert_eq!(
            route_for_profile(&profile(Role::Student, false)),
            "/role-selection"
        );
    }

    #[test]
    fn staff_and_admin_land_on_staff() {
        assert_eq!(route_for_profile(&profile(Role::Staff, true)), "/staff");
        assert_eq!(route_for_profile(&profile(Role::Admin, true)), "/staff");
    }

    #[test]
    fn students_land_on_home() {
        assert_eq!(route_for_profile(&profile(Role::Student, true)), "/home");
    }

    #[tokio::test]
    async fn no_session_redirects_to_login() {
        let provider = Arc::new(MockProvider::succeeding());
        let response = root(
            HeaderMap::new(),
            Extension(lazy_pool()),
            Extension(auth_state(provider.clone())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "https://den.acu.edu/login");
        assert_eq!(provider.user_count(), 0);
    }

    #[tokio::test]
    async fn lookup_failure_fails_open_to_home() {
        let provider = Arc::new(MockProvider::succeeding());
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("den_access_token=token-123"),
        );

        let response = root(
            headers,
            Extension(lazy_pool()),
            Extension(auth_state(provider.clone())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "https://den.acu.edu/home");
        assert_eq!(provider.user_count(), 1);
    }

    #[tokio::test]
    async fn stale_session_redirects_to_login() {
        // `failing` mocks also answer get_user with no user.
        let provider = Arc::new(MockProvider::failing("unused"));
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("den_access_token=stale-token"),
        );

        let response = root(
            headers,
            Extension(lazy_pool()),
            Extension(auth_state(provider.clone())),
        )
        .await;

        assert_eq!(location(&response), "https://den.acu.edu/login");
        assert_eq!(provider.user_count(), 1);
    }
}
