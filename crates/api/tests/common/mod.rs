//! Shared helpers for router integration tests.

#![allow(dead_code)]

use std::{str::FromStr, sync::Arc};

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
    response::Response,
};
use fake::{Fake, faker::internet::en::SafeEmail, faker::name::en::Name};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use safar_api::{AppState, create_router};
use safar_db::{
    UserRepository,
    entities::{sea_orm_active_enums::UserRole, users},
    migration::Migrator,
    repositories::CreateUserInput,
};
use safar_shared::{JwtConfig, JwtService};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

/// Router over a fresh in-memory database.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let state = AppState {
            db: Arc::new(db),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: "router-test-secret".to_string(),
                token_expires_days: 7,
            })),
            timezone: chrono_tz::Tz::UTC,
        };

        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    /// Inserts a user with `role` and returns a bearer token for it.
    pub async fn user_token(&self, role: UserRole) -> (users::Model, String) {
        let user = UserRepository::new((*self.state.db).clone())
            .create(CreateUserInput {
                name: Name().fake(),
                email: SafeEmail().fake(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
                role,
            })
            .await
            .expect("Failed to create user");

        let role_str = match role {
            UserRole::Admin => "admin",
            UserRole::Employee => "employee",
        };
        let token = self
            .state
            .jwt_service
            .generate_token(user.id, role_str)
            .expect("Failed to sign token");
        (user, token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Sends a request and decodes the JSON body.
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        let bytes = body_bytes(response).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

pub async fn body_bytes(response: Response) -> Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes()
}

/// Reads a money field, which the API renders as a decimal string.
pub fn money(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("expected a money value, got {other}"),
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, None)
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    request("DELETE", uri, token, None)
}

pub fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    request("POST", uri, token, Some(body))
}

pub fn put_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    request("PUT", uri, token, Some(body))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("valid request"),
        None => builder.body(Body::empty()).expect("valid request"),
    }
}
