//! Dashboard routes.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use safar_db::StatsRepository;
use serde::Deserialize;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiQuery, day_window},
};

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/stats", get(get_stats))
}

/// Query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// Restricts booking figures to one creation day.
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

/// GET /dashboard/stats
async fn get_stats(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let created = day_window(query.created_at.as_deref(), state.timezone);
    let stats = StatsRepository::new((*state.db).clone())
        .dashboard(created)
        .await?;

    Ok(Json(stats))
}
