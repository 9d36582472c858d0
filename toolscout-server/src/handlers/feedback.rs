//! Search feedback handler
//!
//! Confirming a search hit promotes the query photo into the catalog:
//! it is re-fingerprinted, attached to the confirmed tool, and an
//! inspection event records the confirmation. This is the only write
//! the search flow ever produces.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use toolscout_core::Fingerprint;
use utoipa::ToSchema;

use crate::db::{CreateEvent, ToolImage};
use crate::error::ApiError;
use crate::state::AppState;

/// Event note recorded when a query photo is confirmed
const FEEDBACK_NOTE: &str = "이미지 확정(학습 데이터 편입)";

/// Request to confirm a search hit
#[derive(Deserialize, ToSchema)]
pub struct FeedbackRequest {
    /// The tool the query photo actually showed
    pub tool_id: i64,
    /// Stored name of the query photo, as returned by /search
    pub query_image: String,
}

/// Response after recording feedback
#[derive(Serialize, ToSchema)]
pub struct FeedbackResponse {
    /// The catalog entry the query photo became
    pub image: ToolImage,
}

/// Confirm that a query photo shows a given tool.
#[utoipa::path(
    post,
    path = "/feedback",
    tag = "Search",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Photo promoted into the catalog", body = FeedbackResponse),
        (status = 400, description = "Invalid image reference"),
        (status = 404, description = "No such tool or query photo"),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn feedback_handler(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let store = state.require_store()?;

    store
        .tools
        .find_by_id(request.tool_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Tool {} not found", request.tool_id)))?;

    // Re-hash from the stored bytes rather than trusting the client
    // with a fingerprint.
    let data = state.images.read(&request.query_image).await?;
    let fingerprint = Fingerprint::from_image_bytes(&data)?;

    let image = store
        .images
        .insert(request.tool_id, &request.query_image, &fingerprint.to_hex())
        .await?;

    store
        .events
        .append(
            request.tool_id,
            &CreateEvent {
                event_type: "점검".to_string(),
                person: String::new(),
                note: FEEDBACK_NOTE.to_string(),
            },
        )
        .await?;

    tracing::info!(
        tool_id = request.tool_id,
        image = %request.query_image,
        "Query photo confirmed into catalog"
    );

    Ok(Json(FeedbackResponse { image }))
}
