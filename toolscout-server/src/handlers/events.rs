//! Tool event log handlers
//!
//! Records checkouts, returns, and inspections against tools, and
//! serves the recent history per tool.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::{CreateEvent, ToolEvent};
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_EVENT_LIMIT: i64 = 100;
const MAX_EVENT_LIMIT: i64 = 1000;

/// Request to record an event against a tool
#[derive(Deserialize, ToSchema)]
pub struct AddEventRequest {
    pub tool_id: i64,
    /// 반출, 반납, 점검, or a free-form label
    pub event_type: String,
    #[serde(default)]
    pub person: String,
    #[serde(default)]
    pub note: String,
}

/// Query parameters for the event list
#[derive(Deserialize, ToSchema)]
pub struct EventListQuery {
    /// Maximum number of events to return (default 100, capped at 1000)
    pub limit: Option<i64>,
}

/// Response for the event list endpoint
#[derive(Serialize, ToSchema)]
pub struct EventListResponse {
    pub count: usize,
    pub events: Vec<ToolEvent>,
}

/// Record an event against a tool.
#[utoipa::path(
    post,
    path = "/events",
    tag = "Events",
    request_body = AddEventRequest,
    responses(
        (status = 200, description = "Recorded event", body = ToolEvent),
        (status = 400, description = "Blank event type"),
        (status = 404, description = "No such tool"),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn add_event_handler(
    State(state): State<AppState>,
    Json(request): Json<AddEventRequest>,
) -> Result<Json<ToolEvent>, ApiError> {
    let store = state.require_store()?;

    if request.event_type.trim().is_empty() {
        return Err(ApiError::bad_request("Event type must not be empty"));
    }

    store
        .tools
        .find_by_id(request.tool_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Tool {} not found", request.tool_id)))?;

    let event = store
        .events
        .append(
            request.tool_id,
            &CreateEvent {
                event_type: request.event_type,
                person: request.person,
                note: request.note,
            },
        )
        .await?;

    Ok(Json(event))
}

/// Recent events for one tool, newest first.
#[utoipa::path(
    get,
    path = "/tools/{id}/events",
    tag = "Events",
    params(
        ("id" = i64, Path, description = "Tool ID"),
        ("limit" = Option<i64>, Query, description = "Maximum events to return")
    ),
    responses(
        (status = 200, description = "Event history", body = EventListResponse),
        (status = 404, description = "No such tool"),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn list_events_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<EventListResponse>, ApiError> {
    let store = state.require_store()?;

    store
        .tools
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Tool {} not found", id)))?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_EVENT_LIMIT)
        .clamp(1, MAX_EVENT_LIMIT);
    let events = store.events.list_for_tool(id, limit).await?;

    Ok(Json(EventListResponse {
        count: events.len(),
        events,
    }))
}
