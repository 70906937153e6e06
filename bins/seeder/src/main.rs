//! Database seeder for Safar development and testing.
//!
//! Applies pending migrations, then seeds an admin account, a few air
//! companies and a sample customer. Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder
//!
//! Reads `DATABASE_URL`; the admin password comes from
//! `SEED_ADMIN_PASSWORD` (default `admin123`).

use anyhow::Context;
use safar_core::auth::hash_password;
use safar_db::{
    AirCompRepository, CustomerRepository, UserRepository,
    entities::{sea_orm_active_enums::UserRole, users},
    migration::Migrator,
    repositories::{AirCompFilter, AirCompInput, CreateCustomerInput, CreateUserInput},
};
use safar_shared::{PageRequest, config::DatabaseConfig};
use sea_orm_migration::{MigratorTrait, sea_orm::DatabaseConnection};

const ADMIN_EMAIL: &str = "admin@safar.local";
const AIR_COMPANIES: &[(&str, &str)] = &[
    ("EgyptAir", "+20 2 2696 6300"),
    ("Saudia", "+966 9200 22222"),
    ("Emirates", "+971 600 555 555"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = safar_db::connect(&DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
    })
    .await?;
    Migrator::up(&db, None).await?;

    println!("Seeding admin user...");
    let admin = seed_admin(&db).await?;

    println!("Seeding air companies...");
    seed_air_companies(&db).await?;

    println!("Seeding sample customer...");
    seed_customer(&db, &admin).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_admin(db: &DatabaseConnection) -> anyhow::Result<users::Model> {
    let repo = UserRepository::new(db.clone());
    if let Some(existing) = repo.find_by_email(ADMIN_EMAIL).await? {
        println!("  Admin already exists, skipping...");
        return Ok(existing);
    }

    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let admin = repo
        .create(CreateUserInput {
            name: "Administrator".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash_password(&password)?,
            role: UserRole::Admin,
        })
        .await?;
    println!("  Created {ADMIN_EMAIL}");
    Ok(admin)
}

async fn seed_air_companies(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = AirCompRepository::new(db.clone());
    for (name, phone) in AIR_COMPANIES {
        let filter = AirCompFilter {
            name: Some((*name).to_string()),
        };
        let (found, _) = repo.list(&filter, PageRequest::new(1, 100)).await?;
        if found.iter().any(|c| c.name == *name) {
            println!("  {name} already exists, skipping...");
            continue;
        }

        repo.create(AirCompInput {
            name: (*name).to_string(),
            phone: Some((*phone).to_string()),
            address: None,
        })
        .await?;
        println!("  Created {name}");
    }
    Ok(())
}

async fn seed_customer(
    db: &DatabaseConnection,
    admin: &users::Model,
) -> anyhow::Result<()> {
    let repo = CustomerRepository::new(db.clone());
    if repo.count().await? > 0 {
        println!("  Customers already present, skipping...");
        return Ok(());
    }

    repo.create(
        CreateCustomerInput {
            name: "أحمد محمد".to_string(),
            phone: "01000000000".to_string(),
            email: None,
            national_id: None,
            passport_number: Some("A12345678".to_string()),
            nationality: Some("مصري".to_string()),
            address: None,
            notes: Some("Sample record".to_string()),
        },
        admin.id,
    )
    .await?;
    Ok(())
}
