//! Inventory dashboard handler
//!
//! One aggregate view: grand totals plus per-status, per-location, and
//! per-major-category breakdowns.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::{CategorySummary, LocationSummary, StatusSummary, Totals};
use crate::error::ApiError;
use crate::state::AppState;

/// Aggregated inventory overview
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub totals: Totals,
    pub by_status: Vec<StatusSummary>,
    pub by_location: Vec<LocationSummary>,
    pub by_category: Vec<CategorySummary>,
    /// Tools with no category at any level
    pub unclassified: i64,
}

/// Inventory-wide aggregates.
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Inventory overview", body = DashboardResponse),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn dashboard_handler(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let store = state.require_store()?;

    let totals = store.tools.totals().await?;
    let by_status = store.tools.by_status().await?;
    let by_location = store.tools.by_location().await?;
    let by_category = store.tools.by_category_major().await?;
    let unclassified = store.tools.unclassified_count().await?;

    Ok(Json(DashboardResponse {
        totals,
        by_status,
        by_location,
        by_category,
        unclassified,
    }))
}
