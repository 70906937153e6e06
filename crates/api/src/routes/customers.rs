//! Customer routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use safar_core::export::{CUSTOMER_HEADERS, Cell, Sheet, format_date};
use safar_db::repositories::{
    CreateCustomerInput, CustomerFilter, CustomerRepository, UpdateCustomerInput,
};
use safar_shared::{PageRequest, PageResponse};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use super::{blank_to_none, export::xlsx_response};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiQuery, ValidatedJson, day_window},
    middleware::AuthUser,
    response::{DataResponse, MessageResponse},
};

/// Creates the customer routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/export/excel", get(export_customers))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Query parameters for listing customers.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerQuery {
    /// Substring of the name.
    pub name: Option<String>,
    /// Substring of the phone.
    pub phone: Option<String>,
    /// Nationality.
    pub nationality: Option<String>,
    /// Creation day, `dd/mm/yyyy` or ISO.
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl CustomerQuery {
    fn into_filter(self, state: &AppState) -> CustomerFilter {
        CustomerFilter {
            created: day_window(self.created_at.as_deref(), state.timezone),
            name: self.name,
            phone: self.phone,
            nationality: self.nationality,
        }
    }
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    /// Full name.
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub name: String,
    /// Contact phone.
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    /// Contact email.
    #[validate(email(message = "Please provide a valid email"))]
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

/// Request body for updating a customer. Blank strings clear optional fields.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    /// Full name.
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub name: Option<String>,
    /// Contact phone.
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: Option<String>,
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

/// GET /customers
async fn list_customers(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(query): ApiQuery<CustomerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page.normalized();
    let filter = query.into_filter(&state);

    let (items, total) = CustomerRepository::new((*state.db).clone())
        .list(&filter, page)
        .await?;

    Ok(Json(PageResponse::new(items, page, total)))
}

/// GET /customers/{id}
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = CustomerRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?;
    Ok(Json(DataResponse::new(customer)))
}

/// POST /customers
async fn create_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreateCustomerInput {
        name: payload.name.trim().to_string(),
        phone: payload.phone.trim().to_string(),
        email: blank_to_none(payload.email),
        national_id: blank_to_none(payload.national_id),
        passport_number: blank_to_none(payload.passport_number),
        nationality: blank_to_none(payload.nationality),
        address: blank_to_none(payload.address),
        notes: blank_to_none(payload.notes),
    };

    let customer = CustomerRepository::new((*state.db).clone())
        .create(input, auth.user_id())
        .await?;

    info!(customer_id = %customer.id, user_id = %auth.user_id(), "Customer created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(customer))))
}

/// PUT /customers/{id}
async fn update_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(email) = payload.email.as_deref().map(str::trim)
        && !email.is_empty()
        && !email.to_string().validate_email()
    {
        return Err(ApiError::validation("Please provide a valid email"));
    }

    let input = UpdateCustomerInput {
        name: payload.name.map(|s| s.trim().to_string()),
        phone: payload.phone.map(|s| s.trim().to_string()),
        email: payload.email.map(|s| blank_to_none(Some(s))),
        national_id: payload.national_id.map(|s| blank_to_none(Some(s))),
        passport_number: payload.passport_number.map(|s| blank_to_none(Some(s))),
        nationality: payload.nationality.map(|s| blank_to_none(Some(s))),
        address: payload.address.map(|s| blank_to_none(Some(s))),
        notes: payload.notes.map(|s| blank_to_none(Some(s))),
    };

    let customer = CustomerRepository::new((*state.db).clone())
        .update(id, input, auth.user_id())
        .await?;

    info!(customer_id = %id, user_id = %auth.user_id(), "Customer updated");
    Ok(Json(DataResponse::new(customer)))
}

/// DELETE /customers/{id} - admin only.
async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    CustomerRepository::new((*state.db).clone())
        .delete(id)
        .await?;

    info!(customer_id = %id, user_id = %auth.user_id(), "Customer deleted");
    Ok(Json(MessageResponse::new("Customer deleted")))
}

/// GET /customers/export/excel
async fn export_customers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CustomerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tz = state.timezone;
    let filter = query.into_filter(&state);
    let customers = CustomerRepository::new((*state.db).clone())
        .list_all(&filter)
        .await?;

    let mut sheet = Sheet::new("العملاء", CUSTOMER_HEADERS);
    for c in customers {
        sheet.push_row(vec![
            c.name.into(),
            c.phone.into(),
            Cell::opt_text(c.email),
            Cell::opt_text(c.national_id),
            Cell::opt_text(c.passport_number),
            Cell::opt_text(c.nationality),
            Cell::opt_text(c.address),
            Cell::opt_text(c.notes),
            format_date(c.created_at.with_timezone(&Utc), tz).into(),
        ])?;
    }

    xlsx_response(&sheet, "customers.xlsx")
}
