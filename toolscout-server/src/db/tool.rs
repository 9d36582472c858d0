//! Tool entity and repository
//!
//! Handles the inventory records the search core filters and ranks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use toolscout_core::ToolAttributes;
use utoipa::ToSchema;

/// Tool entity from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tool {
    pub id: i64,
    pub name: String,
    pub purpose: String,
    pub location: String,
    pub status: String,
    pub qty: i32,
    pub purchase_amount: i64,
    pub cat_l: String,
    pub cat_m: String,
    pub cat_s: String,
    #[schema(value_type = String, example = "2026-08-31T09:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl Tool {
    /// The attribute tuple the filter/bonus evaluator inspects.
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

/// Tool row for list views, carrying the most recent reference photo.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ToolListRow {
    pub id: i64,
    pub name: String,
    pub purpose: String,
    pub location: String,
    pub status: String,
    pub qty: i32,
    pub purchase_amount: i64,
    pub cat_l: String,
    pub cat_m: String,
    pub cat_s: String,
    #[schema(value_type = String, example = "2026-08-31T09:00:00Z")]
    pub created_at: DateTime<Utc>,
    /// File name of the latest stored photo, if any
    pub ref_image: Option<String>,
}

impl ToolListRow {
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

/// DTO for registering a new tool
#[derive(Debug, Clone)]
pub struct CreateTool {
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

/// DTO for updating a tool's attributes
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTool {
    pub name: String,
    #[serde(default)]
    pub purpose: String,
    pub location: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub qty: i32,
    #[serde(default)]
    pub purchase_amount: i64,
    #[serde(default)]
    pub cat_l: String,
    #[serde(default)]
    pub cat_m: String,
    #[serde(default)]
    pub cat_s: String,
}

fn default_status() -> String {
    "정상".to_string()
}

/// Filters for list, CSV export, and report queries.
///
/// Unlike search criteria, these are applied in SQL: the list pages of
/// the original system filtered in the database, and only the search
/// flow goes through the core evaluator.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ToolFilter {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: String,
    /// Substring match on name or purpose
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub cat_l: String,
    #[serde(default)]
    pub cat_m: String,
    #[serde(default)]
    pub cat_s: String,
    /// "1" restricts to tools with all three category levels empty
    #[serde(default)]
    pub unclassified: String,
}

impl ToolFilter {
    fn unclassified_only(&self) -> bool {
        self.unclassified.trim() == "1"
    }

    /// Append the WHERE clause for this filter to a query builder.
    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut first = true;
        let mut and = |qb: &mut QueryBuilder<'_, Postgres>| {
            qb.push(if first { " WHERE " } else { " AND " });
            first = false;
        };

        if !self.location.trim().is_empty() {
            and(qb);
            qb.push("t.location = ").push_bind(self.location.trim().to_string());
        }
        if !self.status.trim().is_empty() {
            and(qb);
            qb.push("t.status = ").push_bind(self.status.trim().to_string());
        }
        if !self.q.trim().is_empty() {
            let pattern = format!("%{}%", self.q.trim());
            and(qb);
            qb.push("(t.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR t.purpose ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if !self.cat_l.trim().is_empty() {
            and(qb);
            qb.push("t.cat_l = ").push_bind(self.cat_l.trim().to_string());
        }
        if !self.cat_m.trim().is_empty() {
            and(qb);
            qb.push("t.cat_m = ").push_bind(self.cat_m.trim().to_string());
        }
        if !self.cat_s.trim().is_empty() {
            and(qb);
            qb.push("t.cat_s = ").push_bind(self.cat_s.trim().to_string());
        }
        if self.unclassified_only() {
            and(qb);
            qb.push("TRIM(t.cat_l) = '' AND TRIM(t.cat_m) = '' AND TRIM(t.cat_s) = ''");
        }
    }
}

/// Inventory-wide totals
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Totals {
    pub items: i64,
    pub qty: i64,
    pub amount: i64,
}

/// Per-status aggregate
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StatusSummary {
    pub status: String,
    pub items: i64,
    pub qty: i64,
    pub amount: i64,
}

/// Per-location aggregate
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LocationSummary {
    pub location: String,
    pub items: i64,
    pub qty: i64,
    pub amount: i64,
}

/// Per-major-category aggregate
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CategorySummary {
    pub cat_l: String,
    pub items: i64,
    pub qty: i64,
}

const LIST_COLUMNS: &str = "t.id, t.name, t.purpose, t.location, t.status, t.qty, \
     t.purchase_amount, t.cat_l, t.cat_m, t.cat_s, t.created_at, \
     (SELECT ti.image_path FROM tool_images ti \
      WHERE ti.tool_id = t.id ORDER BY ti.id DESC LIMIT 1) AS ref_image";

/// Repository for tool database operations
#[derive(Clone)]
pub struct ToolRepository {
    pool: PgPool,
}

impl ToolRepository {
    /// Create a new tool repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new tool
    pub async fn create(&self, input: CreateTool) -> Result<Tool, sqlx::Error> {
        sqlx::query_as::<_, Tool>(
            r#"
            INSERT INTO tools (name, purpose, location, status, qty, purchase_amount, cat_l, cat_m, cat_s)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(input.name.trim())
        .bind(input.purpose.trim())
        .bind(input.location.trim())
        .bind(input.status.trim())
        .bind(input.qty)
        .bind(input.purchase_amount)
        .bind(input.cat_l.trim())
        .bind(input.cat_m.trim())
        .bind(input.cat_s.trim())
        .fetch_one(&self.pool)
        .await
    }

    /// Find tool by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Tool>, sqlx::Error> {
        sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Update a tool's attributes, returning the updated row
    pub async fn update(&self, id: i64, input: UpdateTool) -> Result<Option<Tool>, sqlx::Error> {
        sqlx::query_as::<_, Tool>(
            r#"
            UPDATE tools
            SET name = $1, purpose = $2, location = $3, status = $4,
                qty = $5, purchase_amount = $6, cat_l = $7, cat_m = $8, cat_s = $9
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(input.name.trim())
        .bind(input.purpose.trim())
        .bind(input.location.trim())
        .bind(input.status.trim())
        .bind(input.qty)
        .bind(input.purchase_amount)
        .bind(input.cat_l.trim())
        .bind(input.cat_m.trim())
        .bind(input.cat_s.trim())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a tool and its dependent rows.
    ///
    /// Returns the image file names that belonged to the tool so the
    /// caller can unlink them after the transaction commits, or `None`
    /// when no such tool existed.
    pub async fn delete(&self, id: i64) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let paths: Vec<String> =
            sqlx::query_scalar("SELECT image_path FROM tool_images WHERE tool_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        // Child rows go with the tool via ON DELETE CASCADE
        let deleted: Option<i64> = sqlx::query_scalar("DELETE FROM tools WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(deleted.map(|_| paths))
    }

    /// Filtered list with thumbnails, ordered by location then recency
    pub async fn list(&self, filter: &ToolFilter) -> Result<Vec<ToolListRow>, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!("SELECT {LIST_COLUMNS} FROM tools t"));
        filter.push_where(&mut qb);
        qb.push(" ORDER BY t.location ASC, t.id DESC");

        qb.build_query_as::<ToolListRow>().fetch_all(&self.pool).await
    }

    /// Most recently registered tools with thumbnails.
    ///
    /// Used by the criteria-only search path, which filters in the core
    /// evaluator rather than in SQL.
    pub async fn recent(&self, limit: i64) -> Result<Vec<ToolListRow>, sqlx::Error> {
        sqlx::query_as::<_, ToolListRow>(&format!(
            "SELECT {LIST_COLUMNS} FROM tools t ORDER BY t.id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Filtered rows for CSV export and reports, ordered for printing
    pub async fn fetch_for_export(&self, filter: &ToolFilter) -> Result<Vec<Tool>, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT t.* FROM tools t");
        filter.push_where(&mut qb);
        qb.push(" ORDER BY t.location ASC, t.name ASC, t.id ASC");

        qb.build_query_as::<Tool>().fetch_all(&self.pool).await
    }

    /// Inventory-wide totals
    pub async fn totals(&self) -> Result<Totals, sqlx::Error> {
        sqlx::query_as::<_, Totals>(
            r#"
            SELECT COUNT(*) AS items,
                   COALESCE(SUM(qty), 0)::BIGINT AS qty,
                   COALESCE(SUM(purchase_amount), 0)::BIGINT AS amount
            FROM tools
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    /// Aggregates per status, largest holdings first
    pub async fn by_status(&self) -> Result<Vec<StatusSummary>, sqlx::Error> {
        sqlx::query_as::<_, StatusSummary>(
            r#"
            SELECT status,
                   COUNT(*) AS items,
                   COALESCE(SUM(qty), 0)::BIGINT AS qty,
                   COALESCE(SUM(purchase_amount), 0)::BIGINT AS amount
            FROM tools
            GROUP BY status
            ORDER BY qty DESC, items DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Aggregates per location
    pub async fn by_location(&self) -> Result<Vec<LocationSummary>, sqlx::Error> {
        sqlx::query_as::<_, LocationSummary>(
            r#"
            SELECT location,
                   COUNT(*) AS items,
                   COALESCE(SUM(qty), 0)::BIGINT AS qty,
                   COALESCE(SUM(purchase_amount), 0)::BIGINT AS amount
            FROM tools
            GROUP BY location
            ORDER BY qty DESC, location ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Aggregates per major category
    pub async fn by_category_major(&self) -> Result<Vec<CategorySummary>, sqlx::Error> {
        sqlx::query_as::<_, CategorySummary>(
            r#"
            SELECT cat_l,
                   COUNT(*) AS items,
                   COALESCE(SUM(qty), 0)::BIGINT AS qty
            FROM tools
            GROUP BY cat_l
            ORDER BY qty DESC, items DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Tools with all three category levels empty
    pub async fn unclassified_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tools
            WHERE TRIM(cat_l) = '' AND TRIM(cat_m) = '' AND TRIM(cat_s) = ''
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_attributes_conversion() {
        let tool = Tool {
            id: 1,
            name: "드릴".to_string(),
            purpose: "타공".to_string(),
            location: "전기실".to_string(),
            status: "정상".to_string(),
            qty: 2,
            purchase_amount: 120_000,
            cat_l: "기계".to_string(),
            cat_m: "공구".to_string(),
            cat_s: "드릴".to_string(),
            created_at: Utc::now(),
        };

        let attrs = tool.attributes();
        assert_eq!(attrs.name, "드릴");
        assert_eq!(attrs.qty, 2);
        assert_eq!(attrs.purchase_amount, 120_000);
    }

    #[test]
    fn test_attributes_clamp_negative_values() {
        let tool = Tool {
            id: 1,
            name: "x".to_string(),
            purpose: String::new(),
            location: String::new(),
            status: String::new(),
            qty: -3,
            purchase_amount: -1,
            cat_l: String::new(),
            cat_m: String::new(),
            cat_s: String::new(),
            created_at: Utc::now(),
        };

        let attrs = tool.attributes();
        assert_eq!(attrs.qty, 0);
        assert_eq!(attrs.purchase_amount, 0);
    }

    #[test]
    fn test_unclassified_flag_parsing() {
        let mut filter = ToolFilter::default();
        assert!(!filter.unclassified_only());

        filter.unclassified = "1".to_string();
        assert!(filter.unclassified_only());

        filter.unclassified = " 1 ".to_string();
        assert!(filter.unclassified_only());

        filter.unclassified = "true".to_string();
        assert!(!filter.unclassified_only());
    }
}
