//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod advances;
pub mod air_comps;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod export;
pub mod health;
pub mod payments;
pub mod transfers;
pub mod treasury;

/// Trims an optional string; blank input becomes `None`.
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Creates the API router. Everything except health and the public auth
/// endpoints sits behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(customers::routes())
        .merge(transfers::routes())
        .merge(payments::routes())
        .merge(air_comps::routes())
        .merge(treasury::routes())
        .merge(advances::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

#[cfg(test)]
mod tests {
    use super::blank_to_none;

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(None), None);
        assert_eq!(blank_to_none(Some("   ".into())), None);
        assert_eq!(blank_to_none(Some(" x ".into())), Some("x".to_string()));
    }
}
