//! Query and response types for the auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;

/// Query parameters accepted by the callback resolver. Providers differ in
/// which subset they send; classification happens on whichever fields are
/// present.
#[derive(Deserialize, Debug, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub token_hash: Option<String>,
    #[serde(rename = "type")]
    pub otp_type: Option<String>,
    pub next: Option<String>,
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

/// Query parameters of the Microsoft relay callback.
#[derive(Deserialize, Debug, Default)]
pub struct RelayCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Query parameters of the Microsoft login initiation.
#[derive(Deserialize, Debug, Default)]
pub struct RelayLoginParams {
    #[serde(alias = "redirectTo")]
    pub redirect_to: Option<String>,
}

/// Role context for the rendering layer. Not authoritative for security;
/// real authorization stays server-side.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RoleResponse {
    pub role: Role,
    pub has_completed_onboarding: bool,
}
