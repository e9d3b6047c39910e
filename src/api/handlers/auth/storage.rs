//! Database lookups backing the routing decision.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::role::Role;

/// Persisted per-user state read once per routing decision.
pub(crate) struct UserProfile {
    pub(crate) user_id: Uuid,
    pub(crate) role: Role,
    pub(crate) has_completed_onboarding: bool,
}

/// Look up the profile behind an authenticated user id.
///
/// `Ok(None)` means the user has no profile row yet (first login before
/// onboarding has created one).
pub(crate) async fn lookup_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfile>> {
    let query = "SELECT user_id, role, has_completed_onboarding FROM profiles WHERE user_id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user profile")?;

    Ok(row.map(|row| {
        let role: String = row.get("role");
        UserProfile {
            user_id: row.get("user_id"),
            role: Role::parse_or_default(&role),
            has_completed_onboarding: row.get("has_completed_onboarding"),
        }
    }))
}
