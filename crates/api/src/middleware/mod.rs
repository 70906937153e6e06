//! Request middleware.

pub mod auth;

pub use auth::{AuthUser, TOKEN_COOKIE, auth_middleware};
