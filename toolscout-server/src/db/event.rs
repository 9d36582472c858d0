//! Checkout/return/inspection event log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

/// Recorded lifecycle event for a tool
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ToolEvent {
    pub id: i64,
    pub tool_id: i64,
    /// 반출, 반납, 점검, or a free-form label
    pub event_type: String,
    pub person: String,
    pub note: String,
    #[schema(value_type = String, example = "2026-08-31T09:00:00Z")]
    pub created_at: DateTime<Utc>,
}

/// DTO for appending an event
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEvent {
    pub event_type: String,
    #[serde(default)]
    pub person: String,
    #[serde(default)]
    pub note: String,
}

/// Repository for the append-only event log
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an event to a tool's history
    pub async fn append(&self, tool_id: i64, input: &CreateEvent) -> Result<ToolEvent, sqlx::Error> {
        sqlx::query_as::<_, ToolEvent>(
            r#"
            INSERT INTO tool_events (tool_id, event_type, person, note)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(tool_id)
        .bind(input.event_type.trim())
        .bind(input.person.trim())
        .bind(input.note.trim())
        .fetch_one(&self.pool)
        .await
    }

    /// Recent events for one tool, newest first
    pub async fn list_for_tool(
        &self,
        tool_id: i64,
        limit: i64,
    ) -> Result<Vec<ToolEvent>, sqlx::Error> {
        sqlx::query_as::<_, ToolEvent>(
            "SELECT * FROM tool_events WHERE tool_id = $1 ORDER BY id DESC LIMIT $2",
        )
        .bind(tool_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
