//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. Tables are built with the
//! schema builder so the same migrations run on PostgreSQL and on the
//! in-memory SQLite databases used by tests.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_initial;
mod m20260301_000002_ledgers;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_initial::Migration),
            Box::new(m20260301_000002_ledgers::Migration),
        ]
    }
}
