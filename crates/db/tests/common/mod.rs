//! Shared helpers for repository integration tests.

use fake::{Fake, faker::internet::en::SafeEmail, faker::name::en::Name};
use safar_db::{
    UserRepository,
    entities::{sea_orm_active_enums::UserRole, users},
    migration::Migrator,
    repositories::CreateUserInput,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory database with the schema applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Inserts an employee with a random name and email.
#[allow(dead_code)]
pub async fn create_user(db: &DatabaseConnection) -> users::Model {
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            name: Name().fake(),
            email: SafeEmail().fake(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role: UserRole::Employee,
        })
        .await
        .expect("Failed to create user")
}
