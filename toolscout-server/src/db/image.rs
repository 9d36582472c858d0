//! Tool image records and the fingerprint catalog

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use toolscout_core::ToolAttributes;
use utoipa::ToSchema;

/// Stored photo of a tool, with its visual fingerprint
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ToolImage {
    pub id: i64,
    pub tool_id: i64,
    pub image_path: String,
    /// 16-hex-digit fingerprint of the photo
    pub ahash: String,
    #[schema(value_type = String, example = "2026-08-31T09:00:00Z")]
    pub created_at: DateTime<Utc>,
}

/// One catalog entry for the similarity scan: a photo's fingerprint
/// joined with its tool's searchable attributes.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogRow {
    pub tool_id: i64,
    pub image_path: String,
    pub ahash: String,
    pub name: String,
    pub purpose: String,
    pub location: String,
    pub status: String,
    pub qty: i32,
    pub purchase_amount: i64,
    pub cat_l: String,
    pub cat_m: String,
    pub cat_s: String,
}

impl CatalogRow {
    pub fn attributes(&self) -> ToolAttributes {
        ToolAttributes {
            name: self.name.clone(),
            purpose: self.purpose.clone(),
            location: self.location.clone(),
            status: self.status.clone(),
            cat_l: self.cat_l.clone(),
            cat_m: self.cat_m.clone(),
            cat_s: self.cat_s.clone(),
            qty: self.qty.max(0) as u32,
            purchase_amount: self.purchase_amount.max(0) as u64,
        }
    }
}

/// Repository for tool photo records
#[derive(Clone)]
pub struct ToolImageRepository {
    pool: PgPool,
}

impl ToolImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach a stored photo and its fingerprint to a tool
    pub async fn insert(
        &self,
        tool_id: i64,
        image_path: &str,
        ahash: &str,
    ) -> Result<ToolImage, sqlx::Error> {
        sqlx::query_as::<_, ToolImage>(
            r#"
            INSERT INTO tool_images (tool_id, image_path, ahash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(tool_id)
        .bind(image_path)
        .bind(ahash)
        .fetch_one(&self.pool)
        .await
    }

    /// All photos of one tool, newest first
    pub async fn list_for_tool(&self, tool_id: i64) -> Result<Vec<ToolImage>, sqlx::Error> {
        sqlx::query_as::<_, ToolImage>(
            "SELECT * FROM tool_images WHERE tool_id = $1 ORDER BY id DESC",
        )
        .bind(tool_id)
        .fetch_all(&self.pool)
        .await
    }

    /// The full fingerprint catalog for a similarity scan.
    ///
    /// Every photo of every tool appears; tools with several photos
    /// contribute several rows on purpose, so the best-matching shot
    /// wins on distance.
    pub async fn snapshot(&self) -> Result<Vec<CatalogRow>, sqlx::Error> {
        sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT ti.tool_id, ti.image_path, ti.ahash,
                   t.name, t.purpose, t.location, t.status,
                   t.qty, t.purchase_amount, t.cat_l, t.cat_m, t.cat_s
            FROM tool_images ti
            JOIN tools t ON t.id = ti.tool_id
            ORDER BY ti.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
