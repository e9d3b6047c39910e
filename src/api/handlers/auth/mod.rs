//! Auth handlers and supporting modules.
//!
//! This module coordinates the authentication bootstrap flow:
//!
//! - the Microsoft OAuth relay (`relay`), which classifies provider callbacks
//!   and forwards a validated destination without ever touching session state;
//! - the callback resolver (`callback`), which exchanges exactly one
//!   credential form (authorization code or one-time email token) for a
//!   provider session and sets the session cookies;
//! - the role context (`role`), derived strictly from the verified session —
//!   never from anything the client can write.
//!
//! ## Redirect targets
//!
//! Every externally supplied destination (`next`, `redirectTo`, the
//! `oauth_redirect` cookie) passes through the relative-path guard in `utils`
//! before use. A crafted absolute URL is silently replaced with the safe
//! default, never followed.

pub(crate) mod callback;
pub(crate) mod provider;
pub(crate) mod relay;
pub(crate) mod role;
pub(crate) mod session;
pub(crate) mod state;
pub(crate) mod storage;
pub(crate) mod types;
pub(crate) mod utils;

pub use provider::{HttpIdentityProvider, IdentityProvider};
pub use role::Role;
pub use state::{AuthConfig, AuthState};
