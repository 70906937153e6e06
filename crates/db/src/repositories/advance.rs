//! Staff advance repository.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use safar_shared::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::filter::{DateWindow, contains_ci};
use crate::entities::{advances, sea_orm_active_enums::AdvanceStatus};

/// Error types for advance operations.
#[derive(Debug, thiserror::Error)]
pub enum AdvanceError {
    /// Advance not found.
    #[error("Advance not found")]
    NotFound(Uuid),

    /// Amount of zero or less.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing advances.
#[derive(Debug, Clone, Default)]
pub struct AdvanceFilter {
    /// Substring of the employee name.
    pub employee_name: Option<String>,
    /// Outstanding or settled.
    pub status: Option<AdvanceStatus>,
    /// Day the advance was handed out.
    pub advance_date: Option<DateWindow>,
}

/// Input for creating an advance.
#[derive(Debug, Clone)]
pub struct CreateAdvanceInput {
    /// Employee receiving the advance.
    pub employee_name: String,
    /// Amount handed out.
    pub amount: Decimal,
    /// When it was handed out.
    pub advance_date: DateTime<FixedOffset>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating an advance. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAdvanceInput {
    /// Employee receiving the advance.
    pub employee_name: Option<String>,
    /// Amount handed out.
    pub amount: Option<Decimal>,
    /// When it was handed out.
    pub advance_date: Option<DateTime<FixedOffset>>,
    /// Outstanding or settled.
    pub status: Option<AdvanceStatus>,
    /// Free-form notes.
    pub notes: Option<Option<String>>,
}

/// Advance repository.
#[derive(Debug, Clone)]
pub struct AdvanceRepository {
    db: DatabaseConnection,
}

impl AdvanceRepository {
    /// Creates a new advance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists one page of advances, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &AdvanceFilter,
        page: PageRequest,
    ) -> Result<(Vec<advances::Model>, u64), AdvanceError> {
        let query = filtered(filter);
        let total = query.clone().count(&self.db).await?;

        let items = query
            .order_by_desc(advances::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Finds an advance by ID.
    ///
    /// # Errors
    ///
    /// Returns `AdvanceError::NotFound` if no such advance exists.
    pub async fn find_by_id(&self, id: Uuid) -> Result<advances::Model, AdvanceError> {
        advances::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AdvanceError::NotFound(id))
    }

    /// Records an outstanding advance.
    ///
    /// # Errors
    ///
    /// Returns `AdvanceError::NonPositiveAmount` for amounts `<= 0`.
    pub async fn create(
        &self,
        input: CreateAdvanceInput,
        user_id: Uuid,
    ) -> Result<advances::Model, AdvanceError> {
        if input.amount <= Decimal::ZERO {
            return Err(AdvanceError::NonPositiveAmount);
        }

        let now = chrono::Utc::now().into();
        let advance = advances::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_name: Set(input.employee_name),
            amount: Set(input.amount),
            advance_date: Set(input.advance_date),
            status: Set(AdvanceStatus::Outstanding),
            notes: Set(input.notes),
            created_by: Set(Some(user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(advance.insert(&self.db).await?)
    }

    /// Applies a partial update, including settling the advance.
    ///
    /// # Errors
    ///
    /// Returns `AdvanceError::NotFound` if no such advance exists.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateAdvanceInput,
    ) -> Result<advances::Model, AdvanceError> {
        let mut active: advances::ActiveModel = self.find_by_id(id).await?.into();

        if let Some(employee_name) = input.employee_name {
            active.employee_name = Set(employee_name);
        }
        if let Some(amount) = input.amount {
            if amount <= Decimal::ZERO {
                return Err(AdvanceError::NonPositiveAmount);
            }
            active.amount = Set(amount);
        }
        if let Some(advance_date) = input.advance_date {
            active.advance_date = Set(advance_date);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an advance.
    ///
    /// # Errors
    ///
    /// Returns `AdvanceError::NotFound` if no such advance exists.
    pub async fn delete(&self, id: Uuid) -> Result<(), AdvanceError> {
        let result = advances::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AdvanceError::NotFound(id));
        }
        Ok(())
    }
}

fn filtered(filter: &AdvanceFilter) -> Select<advances::Entity> {
    let mut query = advances::Entity::find();
    if let Some(name) = filter
        .employee_name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        query = query.filter(contains_ci(advances::Column::EmployeeName, name));
    }
    if let Some(status) = filter.status {
        query = query.filter(advances::Column::Status.eq(status));
    }
    if let Some(window) = filter.advance_date {
        query = query.filter(window.between(advances::Column::AdvanceDate));
    }
    query
}
