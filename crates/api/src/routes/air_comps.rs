//! Air company routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use safar_db::repositories::{AirCompFilter, AirCompInput, AirCompRepository};
use safar_shared::{PageRequest, PageResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::blank_to_none;
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiQuery, ValidatedJson},
    middleware::AuthUser,
    response::{DataResponse, MessageResponse},
};

/// Creates the air company routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/airComp", get(list_air_comps).post(create_air_comp))
        .route(
            "/airComp/{id}",
            get(get_air_comp).put(update_air_comp).delete(delete_air_comp),
        )
}

/// Query parameters for listing air companies.
#[derive(Debug, Default, Deserialize)]
pub struct AirCompQuery {
    /// Substring of the name.
    pub name: Option<String>,
}

/// Request body for creating or replacing an air company.
#[derive(Debug, Deserialize, Validate)]
pub struct AirCompRequest {
    /// Company name.
    #[validate(length(min = 1, message = "Company name is required"))]
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Office address.
    pub address: Option<String>,
}

impl AirCompRequest {
    fn into_input(self) -> Result<AirCompInput, ApiError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::validation("Company name is required"));
        }
        Ok(AirCompInput {
            name,
            phone: blank_to_none(self.phone),
            address: blank_to_none(self.address),
        })
    }
}

/// GET /airComp
async fn list_air_comps(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(query): ApiQuery<AirCompQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page.normalized();
    let filter = AirCompFilter { name: query.name };

    let (items, total) = AirCompRepository::new((*state.db).clone())
        .list(&filter, page)
        .await?;

    Ok(Json(PageResponse::new(items, page, total)))
}

/// GET /airComp/{id}
async fn get_air_comp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let company = AirCompRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?;
    Ok(Json(DataResponse::new(company)))
}

/// POST /airComp
async fn create_air_comp(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<AirCompRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let company = AirCompRepository::new((*state.db).clone())
        .create(payload.into_input()?)
        .await?;

    info!(air_comp_id = %company.id, user_id = %auth.user_id(), "Air company created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(company))))
}

/// PUT /airComp/{id}
async fn update_air_comp(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AirCompRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let company = AirCompRepository::new((*state.db).clone())
        .update(id, payload.into_input()?)
        .await?;

    info!(air_comp_id = %id, user_id = %auth.user_id(), "Air company updated");
    Ok(Json(DataResponse::new(company)))
}

/// DELETE /airComp/{id} - admin only. Bookings keep their record without a carrier.
async fn delete_air_comp(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    AirCompRepository::new((*state.db).clone())
        .delete(id)
        .await?;

    Ok(Json(MessageResponse::new("Air company deleted")))
}
