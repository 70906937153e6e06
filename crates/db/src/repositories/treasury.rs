//! Treasury (cash box) repository.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use safar_shared::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::filter::DateWindow;
use crate::entities::{sea_orm_active_enums::TreasuryEntryType, treasury_entries};

/// Error types for treasury operations.
#[derive(Debug, thiserror::Error)]
pub enum TreasuryError {
    /// Entry not found.
    #[error("Treasury entry not found")]
    NotFound(Uuid),

    /// Amount of zero or less.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing treasury entries.
#[derive(Debug, Clone, Default)]
pub struct TreasuryFilter {
    /// Income or expense.
    pub entry_type: Option<TreasuryEntryType>,
    /// Day of the movement.
    pub entry_date: Option<DateWindow>,
}

/// Input for creating or replacing a treasury entry.
#[derive(Debug, Clone)]
pub struct TreasuryInput {
    /// Income or expense.
    pub entry_type: TreasuryEntryType,
    /// Amount moved.
    pub amount: Decimal,
    /// When the money moved.
    pub entry_date: DateTime<FixedOffset>,
    /// What the movement was for.
    pub description: String,
    /// External reference, e.g. an invoice number.
    pub reference: Option<String>,
}

/// Treasury repository.
#[derive(Debug, Clone)]
pub struct TreasuryRepository {
    db: DatabaseConnection,
}

impl TreasuryRepository {
    /// Creates a new treasury repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists one page of entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &TreasuryFilter,
        page: PageRequest,
    ) -> Result<(Vec<treasury_entries::Model>, u64), TreasuryError> {
        let query = filtered(filter);
        let total = query.clone().count(&self.db).await?;

        let items = query
            .order_by_desc(treasury_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Finds an entry by ID.
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::NotFound` if no such entry exists.
    pub async fn find_by_id(&self, id: Uuid) -> Result<treasury_entries::Model, TreasuryError> {
        treasury_entries::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TreasuryError::NotFound(id))
    }

    /// Creates an entry.
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::NonPositiveAmount` for amounts `<= 0`.
    pub async fn create(
        &self,
        input: TreasuryInput,
        user_id: Uuid,
    ) -> Result<treasury_entries::Model, TreasuryError> {
        if input.amount <= Decimal::ZERO {
            return Err(TreasuryError::NonPositiveAmount);
        }

        let now = chrono::Utc::now().into();
        let entry = treasury_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_type: Set(input.entry_type),
            amount: Set(input.amount),
            entry_date: Set(input.entry_date),
            description: Set(input.description),
            reference: Set(input.reference),
            created_by: Set(Some(user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(entry.insert(&self.db).await?)
    }

    /// Replaces an entry.
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::NotFound` if no such entry exists.
    pub async fn update(
        &self,
        id: Uuid,
        input: TreasuryInput,
    ) -> Result<treasury_entries::Model, TreasuryError> {
        if input.amount <= Decimal::ZERO {
            return Err(TreasuryError::NonPositiveAmount);
        }

        let mut active: treasury_entries::ActiveModel = self.find_by_id(id).await?.into();
        active.entry_type = Set(input.entry_type);
        active.amount = Set(input.amount);
        active.entry_date = Set(input.entry_date);
        active.description = Set(input.description);
        active.reference = Set(input.reference);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an entry.
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::NotFound` if no such entry exists.
    pub async fn delete(&self, id: Uuid) -> Result<(), TreasuryError> {
        let result = treasury_entries::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(TreasuryError::NotFound(id));
        }
        Ok(())
    }
}

fn filtered(filter: &TreasuryFilter) -> Select<treasury_entries::Entity> {
    let mut query = treasury_entries::Entity::find();
    if let Some(entry_type) = filter.entry_type {
        query = query.filter(treasury_entries::Column::EntryType.eq(entry_type));
    }
    if let Some(window) = filter.entry_date {
        query = query.filter(window.between(treasury_entries::Column::EntryDate));
    }
    query
}
