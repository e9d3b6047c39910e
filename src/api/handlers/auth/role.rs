//! Role context derived from the verified session.
//!
//! The dashboard UI asks this endpoint which shell to render. The value is
//! computed fresh from the provider-verified session plus the persisted
//! profile on every request; nothing client-writable is consulted.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::{fmt, str::FromStr, sync::Arc};
use tracing::{error, warn};
use utoipa::ToSchema;

use super::{session, state::AuthState, storage::lookup_profile, types::RoleResponse};

#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Staff,
    Admin,
}

impl Role {
    /// Staff and admin share the staff shell.
    #[must_use]
    pub fn is_staff_level(self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }

    /// Parse a persisted role string, defaulting to student for anything
    /// unknown so a bad row never blocks routing.
    pub(crate) fn parse_or_default(value: &str) -> Self {
        match value.parse() {
            Ok(role) => role,
            Err(_) => {
                warn!("Unknown role {value:?}, defaulting to student");
                Role::Student
            }
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(anyhow::anyhow!("unknown role: {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Staff => write!(f, "staff"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Reactive role value handed to the rendering layer.
#[derive(Clone, Copy, Debug)]
pub struct RoleContext {
    role: Role,
    has_completed_onboarding: bool,
}

impl RoleContext {
    #[must_use]
    pub fn new(role: Role, has_completed_onboarding: bool) -> Self {
        Self {
            role,
            has_completed_onboarding,
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn has_completed_onboarding(&self) -> bool {
        self.has_completed_onboarding
    }

    /// Membership test of the current role in the required set. UI gating
    /// only; endpoints must enforce authorization themselves.
    #[must_use]
    pub fn has_permission(&self, required: &[Role]) -> bool {
        required.contains(&self.role)
    }
}

#[utoipa::path(
    get,
    path = "/v1/auth/role",
    responses(
        (status = 200, description = "Role context for the current session", body = RoleResponse),
        (status = 204, description = "No active session or no profile yet"),
        (status = 500, description = "Profile storage unavailable")
    ),
    tag = "auth"
)]
pub async fn role(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    // Missing cookies are treated as "no session" to avoid leaking auth state.
    let Some(token) = session::extract_access_token(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let user = match auth_state.provider().get_user(&token).await {
        Ok(Some(user)) => user,
        Ok(None) => return StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!("Failed to resolve session user: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match lookup_profile(&pool, user.id).await {
        Ok(Some(profile)) => {
            let context = RoleContext::new(profile.role, profile.has_completed_onboarding);
            let response = RoleResponse {
                role: context.role(),
                has_completed_onboarding: context.has_completed_onboarding(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!("Failed to lookup profile: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
