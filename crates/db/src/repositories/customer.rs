//! Customer repository.

use safar_shared::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::filter::{DateWindow, contains_ci};
use crate::entities::{customers, transfers};

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Customer not found.
    #[error("Customer not found")]
    NotFound(Uuid),

    /// Customer still has bookings.
    #[error("Cannot delete customer with {0} existing transfers")]
    HasTransfers(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Substring of the name.
    pub name: Option<String>,
    /// Substring of the phone number.
    pub phone: Option<String>,
    /// Exact nationality.
    pub nationality: Option<String>,
    /// Day the record was created.
    pub created: Option<DateWindow>,
}

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
    /// Full name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: Option<String>,
    /// National ID number.
    pub national_id: Option<String>,
    /// Passport number.
    pub passport_number: Option<String>,
    /// Nationality.
    pub nationality: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating a customer. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerInput {
    /// Full name.
    pub name: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<Option<String>>,
    /// National ID number.
    pub national_id: Option<Option<String>>,
    /// Passport number.
    pub passport_number: Option<Option<String>>,
    /// Nationality.
    pub nationality: Option<Option<String>>,
    /// Postal address.
    pub address: Option<Option<String>>,
    /// Free-form notes.
    pub notes: Option<Option<String>>,
}

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists one page of customers, newest first, with the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &CustomerFilter,
        page: PageRequest,
    ) -> Result<(Vec<customers::Model>, u64), CustomerError> {
        let query = filtered(filter);
        let total = query.clone().count(&self.db).await?;

        let items = query
            .order_by_desc(customers::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Lists every matching customer, for exports.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(
        &self,
        filter: &CustomerFilter,
    ) -> Result<Vec<customers::Model>, CustomerError> {
        Ok(filtered(filter)
            .order_by_desc(customers::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no such customer exists.
    pub async fn find_by_id(&self, id: Uuid) -> Result<customers::Model, CustomerError> {
        customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }

    /// Creates a customer on behalf of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CreateCustomerInput,
        user_id: Uuid,
    ) -> Result<customers::Model, CustomerError> {
        let now = chrono::Utc::now().into();
        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            phone: Set(input.phone),
            email: Set(input.email),
            national_id: Set(input.national_id),
            passport_number: Set(input.passport_number),
            nationality: Set(input.nationality),
            address: Set(input.address),
            notes: Set(input.notes),
            created_by: Set(Some(user_id)),
            updated_by: Set(Some(user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(customer.insert(&self.db).await?)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no such customer exists.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCustomerInput,
        user_id: Uuid,
    ) -> Result<customers::Model, CustomerError> {
        let customer = self.find_by_id(id).await?;
        let mut active: customers::ActiveModel = customer.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(national_id) = input.national_id {
            active.national_id = Set(national_id);
        }
        if let Some(passport_number) = input.passport_number {
            active.passport_number = Set(passport_number);
        }
        if let Some(nationality) = input.nationality {
            active.nationality = Set(nationality);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.updated_by = Set(Some(user_id));
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a customer that has no bookings.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no such customer exists and
    /// `CustomerError::HasTransfers` if bookings still reference it.
    pub async fn delete(&self, id: Uuid) -> Result<(), CustomerError> {
        let customer = self.find_by_id(id).await?;

        let transfers = transfers::Entity::find()
            .filter(transfers::Column::CustomerId.eq(id))
            .count(&self.db)
            .await?;
        if transfers > 0 {
            return Err(CustomerError::HasTransfers(transfers));
        }

        customers::Entity::delete_by_id(customer.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Counts all customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> Result<u64, CustomerError> {
        Ok(customers::Entity::find().count(&self.db).await?)
    }
}

fn filtered(filter: &CustomerFilter) -> Select<customers::Entity> {
    let mut query = customers::Entity::find();

    if let Some(name) = filter.name.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.filter(contains_ci(customers::Column::Name, name));
    }
    if let Some(phone) = filter.phone.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.filter(customers::Column::Phone.contains(phone.trim()));
    }
    if let Some(nationality) = filter.nationality.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.filter(contains_ci(customers::Column::Nationality, nationality));
    }
    if let Some(window) = filter.created {
        query = query.filter(window.between(customers::Column::CreatedAt));
    }

    query
}
