//! Authentication routes: register, login, logout and the current user.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use safar_core::auth::{check_password_policy, hash_password, verify_password};
use safar_db::{
    UserRepository, entities::sea_orm_active_enums::UserRole, entities::users,
    repositories::CreateUserInput,
};
use safar_shared::auth::{AuthResponse, UserInfo};
use serde::Deserialize;
use tracing::info;
use validator::ValidateEmail;

use crate::{
    AppState,
    error::ApiError,
    middleware::{AuthUser, TOKEN_COOKIE},
    response::{DataResponse, MessageResponse},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Creates the auth routes that need a token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// Registration payload. Missing fields deserialize as blank.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// Login payload. Missing fields deserialize as blank.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// POST /auth/register - Create an employee account and sign it in.
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if [&payload.name, &payload.email, &payload.password]
        .iter()
        .any(|v| v.trim().is_empty())
    {
        return Err(ApiError::validation("Please provide all required fields"));
    }
    if !payload.email.trim().to_string().validate_email() {
        return Err(ApiError::validation("Please provide a valid email"));
    }
    check_password_policy(&payload.password)?;

    let user_repo = UserRepository::new((*state.db).clone());
    if user_repo.email_exists(&payload.email).await? {
        info!("Registration attempt with existing email");
        return Err(ApiError::validation("Email is Already Exist"));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = user_repo
        .create(CreateUserInput {
            name: payload.name,
            email: payload.email,
            password_hash,
            role: UserRole::Employee,
        })
        .await?;

    info!(user_id = %user.id, "User registered");

    let (jar, body) = signed_in(&state, jar, &user)?;
    Ok((StatusCode::CREATED, jar, Json(body)))
}

/// POST /auth/login - Verify credentials and issue a token.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation(INVALID_CREDENTIALS));
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let Some(user) = user_repo.find_by_email(&payload.email).await? else {
        info!("Login attempt for non-existent user");
        return Err(ApiError::validation(INVALID_CREDENTIALS));
    };

    if !user.is_active {
        info!(user_id = %user.id, "Login attempt for disabled user");
        return Err(ApiError::validation(INVALID_CREDENTIALS));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(ApiError::validation(INVALID_CREDENTIALS));
    }

    info!(user_id = %user.id, "User logged in successfully");

    let (jar, body) = signed_in(&state, jar, &user)?;
    Ok((StatusCode::OK, jar, Json(body)))
}

/// POST /auth/logout - Clear the token cookie.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (jar, Json(MessageResponse::new("Logged out")))
}

/// GET /auth/me - Current user's profile.
async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::unauthorized("Not authorized, token failed"))?;

    Ok(Json(DataResponse::new(user_info(&user))))
}

fn user_info(user: &users::Model) -> UserInfo {
    let role: safar_core::auth::UserRole = user.role.into();
    UserInfo {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: role.to_string(),
    }
}

/// Issues a token for `user` and mirrors it into the cookie jar.
fn signed_in(
    state: &AppState,
    jar: CookieJar,
    user: &users::Model,
) -> Result<(CookieJar, AuthResponse), ApiError> {
    let info = user_info(user);
    let token = state.jwt_service.generate_token(user.id, &info.role)?;
    let expires_in = state.jwt_service.expires_in();

    let cookie = Cookie::parse(format!(
        "{TOKEN_COOKIE}={token}; Path=/; Max-Age={expires_in}; SameSite=Lax"
    ))
    .map_err(ApiError::internal)?;

    Ok((
        jar.add(cookie),
        AuthResponse {
            success: true,
            user: info,
            token,
            expires_in,
        },
    ))
}
