//! # The Den (ACU Apex)
//!
//! `den` is the authentication and role-routing service behind the ACU Apex
//! student-progress dashboard. It coordinates three identity mechanisms into a
//! single post-login routing decision:
//!
//! - **OAuth relay** (`/api/auth/microsoft/*`): normalizes Microsoft OAuth
//!   callbacks into the internal redirect contract. The relay classifies and
//!   redirects only; it never touches session state.
//! - **Callback resolver** (`/auth/callback`): exchanges exactly one of an
//!   authorization code or a one-time email token for a provider session and
//!   sets the session cookies.
//! - **Role router** (`/`): reads the authenticated user's profile and issues
//!   exactly one redirect (login, onboarding, staff, or default landing).
//!
//! ## Sessions
//!
//! Sessions are owned by the managed identity provider. The service forwards
//! the opaque access/refresh token pair via `HttpOnly` cookies and never
//! parses or mutates them.
//!
//! ## Redirect safety
//!
//! Every externally supplied redirect target (`next`, `redirectTo`, the
//! `oauth_redirect` cookie) is validated to be a relative path before use.
//! Unsafe values are silently coerced to the safe default landing route.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
