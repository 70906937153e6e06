//! Unit tests for JWT functionality.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use crate::auth::Claims;
use crate::jwt::{JwtConfig, JwtError, JwtService};

const SECRET: &str = "test-secret-key-for-testing";

fn create_test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        token_expires_days: 7,
    })
}

#[test]
fn test_generate_and_validate_token() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();

    let token = service.generate_token(user_id, "admin").unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.role, "admin");
}

#[test]
fn test_token_expires_after_seven_days() {
    let service = create_test_service();
    let token = service.generate_token(Uuid::new_v4(), "employee").unwrap();
    let claims = service.validate_token(&token).unwrap();

    let lifetime = claims.exp - claims.iat;
    assert_eq!(lifetime, 7 * 24 * 60 * 60);
    assert_eq!(service.expires_in(), 604_800);
}

#[test]
fn test_expired_token_is_rejected() {
    let service = create_test_service();
    let claims = Claims::new(Uuid::new_v4(), "admin", Utc::now() - Duration::hours(2));
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(matches!(
        service.validate_token(&token),
        Err(JwtError::Expired)
    ));
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let other = JwtService::new(JwtConfig {
        secret: "another-secret".to_string(),
        token_expires_days: 7,
    });
    let token = other.generate_token(Uuid::new_v4(), "admin").unwrap();

    let result = create_test_service().validate_token(&token);
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_garbage_token_is_rejected() {
    let result = create_test_service().validate_token("invalid.token.here");
    assert!(result.is_err());
}

#[test]
fn test_claims_iat_is_current_time() {
    let before = Utc::now().timestamp();
    let claims = Claims::new(Uuid::new_v4(), "admin", Utc::now() + Duration::hours(1));
    let after = Utc::now().timestamp();

    assert!(claims.iat >= before);
    assert!(claims.iat <= after);
}
