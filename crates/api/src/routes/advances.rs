//! Staff advance routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use safar_db::{
    entities::sea_orm_active_enums::AdvanceStatus,
    repositories::{AdvanceFilter, AdvanceRepository, CreateAdvanceInput, UpdateAdvanceInput},
};
use safar_shared::{PageRequest, PageResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::blank_to_none;
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiQuery, ValidatedJson, blank_as_none, day_window},
    middleware::AuthUser,
    response::{DataResponse, MessageResponse},
};

/// Creates the advance routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/advances", get(list_advances).post(create_advance))
        .route(
            "/advances/{id}",
            get(get_advance).put(update_advance).delete(delete_advance),
        )
}

/// Query parameters for listing advances.
#[derive(Debug, Default, Deserialize)]
pub struct AdvanceQuery {
    /// Substring of the employee name.
    pub employee_name: Option<String>,
    /// `outstanding` or `settled`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<AdvanceStatus>,
    /// Advance day, `dd/mm/yyyy` or ISO.
    pub advance_date: Option<String>,
}

/// Request body for creating an advance.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdvanceRequest {
    /// Employee receiving the advance.
    #[validate(length(min = 1, message = "Employee name is required"))]
    pub employee_name: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Date of the advance (RFC 3339). Defaults to now.
    pub advance_date: Option<DateTime<FixedOffset>>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating or settling an advance.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAdvanceRequest {
    /// Employee receiving the advance.
    #[validate(length(min = 1, message = "Employee name is required"))]
    pub employee_name: Option<String>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Date of the advance (RFC 3339).
    pub advance_date: Option<DateTime<FixedOffset>>,
    /// `outstanding` or `settled`.
    pub status: Option<AdvanceStatus>,
    /// Free-form notes; blank clears them.
    pub notes: Option<String>,
}

/// GET /advances
async fn list_advances(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(query): ApiQuery<AdvanceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page.normalized();
    let filter = AdvanceFilter {
        employee_name: query.employee_name,
        status: query.status,
        advance_date: day_window(query.advance_date.as_deref(), state.timezone),
    };

    let (items, total) = AdvanceRepository::new((*state.db).clone())
        .list(&filter, page)
        .await?;

    Ok(Json(PageResponse::new(items, page, total)))
}

/// GET /advances/{id}
async fn get_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let advance = AdvanceRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?;
    Ok(Json(DataResponse::new(advance)))
}

/// POST /advances
async fn create_advance(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateAdvanceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let employee_name = payload.employee_name.trim().to_string();
    if employee_name.is_empty() {
        return Err(ApiError::validation("Employee name is required"));
    }
    let input = CreateAdvanceInput {
        employee_name,
        amount: payload.amount,
        advance_date: payload
            .advance_date
            .unwrap_or_else(|| Utc::now().fixed_offset()),
        notes: blank_to_none(payload.notes),
    };

    let advance = AdvanceRepository::new((*state.db).clone())
        .create(input, auth.user_id())
        .await?;

    info!(advance_id = %advance.id, user_id = %auth.user_id(), "Advance recorded");
    Ok((StatusCode::CREATED, Json(DataResponse::new(advance))))
}

/// PUT /advances/{id}
async fn update_advance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAdvanceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let employee_name = payload.employee_name.map(|s| s.trim().to_string());
    if employee_name.as_deref() == Some("") {
        return Err(ApiError::validation("Employee name is required"));
    }
    let input = UpdateAdvanceInput {
        employee_name,
        amount: payload.amount,
        advance_date: payload.advance_date,
        status: payload.status,
        notes: payload.notes.map(|s| blank_to_none(Some(s))),
    };

    let advance = AdvanceRepository::new((*state.db).clone())
        .update(id, input)
        .await?;

    info!(advance_id = %id, status = ?advance.status, user_id = %auth.user_id(), "Advance updated");
    Ok(Json(DataResponse::new(advance)))
}

/// DELETE /advances/{id} - admin only.
async fn delete_advance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    AdvanceRepository::new((*state.db).clone())
        .delete(id)
        .await?;

    Ok(Json(MessageResponse::new("Advance deleted")))
}
