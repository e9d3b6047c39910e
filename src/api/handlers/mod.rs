pub(crate) mod auth;
pub mod health;
pub mod root;
