//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use safar_core::auth::UserRole;
use safar_shared::Claims;
use tracing::debug;

use crate::{AppState, error::ApiError};

/// Cookie mirroring the bearer token for browser clients.
pub const TOKEN_COOKIE: &str = "token";

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware that validates JWT tokens.
///
/// The token is read from `Authorization: Bearer` and, failing that, from
/// the `token` cookie. Valid claims are stored in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let header_token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .map(ToString::to_string);
    let token = header_token.or_else(|| {
        jar.get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    });

    let Some(token) = token else {
        return ApiError::unauthorized("Not authorized, no token").into_response();
    };

    match state.jwt_service.validate_token(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            ApiError::unauthorized("Not authorized, token failed").into_response()
        }
    }
}

/// Extractor for authenticated user claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> uuid::Uuid {
        self.0.user_id()
    }

    /// Returns the user's role, if the token carries a known one.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.0.role.parse().ok()
    }

    /// Fails with 403 unless the user may hard-delete records.
    ///
    /// # Errors
    ///
    /// Returns a forbidden `ApiError` for non-admin users.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        match self.role() {
            Some(role) if role.can_delete() => Ok(()),
            _ => Err(ApiError::forbidden(
                "Not authorized, admin access required",
            )),
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("Not authorized, no token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: &str) -> AuthUser {
        AuthUser(Claims::new(Uuid::new_v4(), role, Utc::now()))
    }

    #[test]
    fn test_bearer_prefix() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_only_admins_may_delete() {
        assert!(user("admin").require_admin().is_ok());
        assert!(user("employee").require_admin().is_err());
        assert!(user("unknown").require_admin().is_err());
    }
}
