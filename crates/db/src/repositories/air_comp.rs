//! Air company repository.

use safar_shared::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
    sea_query::Expr,
};
use tracing::info;
use uuid::Uuid;

use super::filter::contains_ci;
use crate::entities::{air_companies, transfers};

/// Error types for air company operations.
#[derive(Debug, thiserror::Error)]
pub enum AirCompError {
    /// Air company not found.
    #[error("Air company not found")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing air companies.
#[derive(Debug, Clone, Default)]
pub struct AirCompFilter {
    /// Substring of the name.
    pub name: Option<String>,
}

/// Input for creating or replacing an air company.
#[derive(Debug, Clone)]
pub struct AirCompInput {
    /// Carrier or issuing agency name.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Office address.
    pub address: Option<String>,
}

/// Air company repository.
#[derive(Debug, Clone)]
pub struct AirCompRepository {
    db: DatabaseConnection,
}

impl AirCompRepository {
    /// Creates a new air company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists one page of air companies, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &AirCompFilter,
        page: PageRequest,
    ) -> Result<(Vec<air_companies::Model>, u64), AirCompError> {
        let query = filtered(filter);
        let total = query.clone().count(&self.db).await?;

        let items = query
            .order_by_desc(air_companies::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Finds an air company by ID.
    ///
    /// # Errors
    ///
    /// Returns `AirCompError::NotFound` if no such company exists.
    pub async fn find_by_id(&self, id: Uuid) -> Result<air_companies::Model, AirCompError> {
        air_companies::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AirCompError::NotFound(id))
    }

    /// Creates an air company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: AirCompInput) -> Result<air_companies::Model, AirCompError> {
        let now = chrono::Utc::now().into();
        let company = air_companies::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            phone: Set(input.phone),
            address: Set(input.address),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(company.insert(&self.db).await?)
    }

    /// Replaces an air company's details.
    ///
    /// # Errors
    ///
    /// Returns `AirCompError::NotFound` if no such company exists.
    pub async fn update(
        &self,
        id: Uuid,
        input: AirCompInput,
    ) -> Result<air_companies::Model, AirCompError> {
        let mut active: air_companies::ActiveModel = self.find_by_id(id).await?.into();
        active.name = Set(input.name);
        active.phone = Set(input.phone);
        active.address = Set(input.address);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an air company and detaches it from its bookings.
    ///
    /// # Errors
    ///
    /// Returns `AirCompError::NotFound` if no such company exists.
    pub async fn delete(&self, id: Uuid) -> Result<(), AirCompError> {
        self.find_by_id(id).await?;

        let txn = self.db.begin().await?;
        let detached = transfers::Entity::update_many()
            .col_expr(transfers::Column::AirCompId, Expr::value(Option::<Uuid>::None))
            .filter(transfers::Column::AirCompId.eq(id))
            .exec(&txn)
            .await?;
        air_companies::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(air_comp_id = %id, detached = detached.rows_affected, "Air company deleted");
        Ok(())
    }

    /// Counts all air companies.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> Result<u64, AirCompError> {
        Ok(air_companies::Entity::find().count(&self.db).await?)
    }
}

fn filtered(filter: &AirCompFilter) -> Select<air_companies::Entity> {
    let mut query = air_companies::Entity::find();
    if let Some(name) = filter.name.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.filter(contains_ci(air_companies::Column::Name, name));
    }
    query
}
