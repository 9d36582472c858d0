//! Inventory export handlers
//!
//! CSV download and the printable report payload. Both honor the same
//! filters as the list endpoint and order rows for printing: location,
//! then name, then registration order.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::{Tool, ToolFilter};
use crate::error::ApiError;
use crate::state::AppState;

const CSV_HEADER: &str =
    "id,name,purpose,location,status,qty,purchase_amount,cat_l,cat_m,cat_s,created_at";

/// Quote one CSV field, doubling embedded quotes.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn csv_row(tool: &Tool) -> String {
    [
        tool.id.to_string(),
        quote(&tool.name),
        quote(&tool.purpose),
        quote(&tool.location),
        quote(&tool.status),
        tool.qty.to_string(),
        tool.purchase_amount.to_string(),
        quote(&tool.cat_l),
        quote(&tool.cat_m),
        quote(&tool.cat_s),
        quote(&tool.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
    ]
    .join(",")
}

/// Render the filtered inventory as CSV. The leading BOM keeps
/// spreadsheet imports from mangling the Korean text.
fn render_csv(tools: &[Tool]) -> String {
    let mut out = String::from("\u{feff}");
    out.push_str(CSV_HEADER);
    for tool in tools {
        out.push('\n');
        out.push_str(&csv_row(tool));
    }
    out
}

/// Download the filtered inventory as a CSV attachment.
#[utoipa::path(
    get,
    path = "/tools/export/csv",
    tag = "Export",
    params(
        ("location" = Option<String>, Query, description = "Exact location"),
        ("status" = Option<String>, Query, description = "Exact status"),
        ("q" = Option<String>, Query, description = "Substring over name and purpose"),
        ("cat_l" = Option<String>, Query, description = "Major category"),
        ("cat_m" = Option<String>, Query, description = "Middle category"),
        ("cat_s" = Option<String>, Query, description = "Minor category"),
        ("unclassified" = Option<String>, Query, description = "\"1\" for uncategorized tools only")
    ),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn export_csv_handler(
    State(state): State<AppState>,
    Query(filter): Query<ToolFilter>,
) -> Result<Response, ApiError> {
    let store = state.require_store()?;

    let tools = store.tools.fetch_for_export(&filter).await?;
    let csv = render_csv(&tools);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=tools.csv",
            ),
        ],
        csv,
    )
        .into_response())
}

/// One location's slice of the printable report
#[derive(Serialize, ToSchema)]
pub struct ReportGroup {
    pub location: String,
    pub items: usize,
    pub qty: i64,
    pub amount: i64,
    pub tools: Vec<Tool>,
}

/// Printable report payload: export rows grouped by location with
/// per-group and grand totals.
#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    pub items: usize,
    pub qty: i64,
    pub amount: i64,
    pub groups: Vec<ReportGroup>,
}

/// Group export-ordered rows by location. Rows already arrive sorted
/// by location, so one pass suffices.
fn group_by_location(tools: Vec<Tool>) -> Vec<ReportGroup> {
    let mut groups: Vec<ReportGroup> = Vec::new();

    for tool in tools {
        let start_new = groups
            .last()
            .map(|g| g.location != tool.location)
            .unwrap_or(true);
        if start_new {
            groups.push(ReportGroup {
                location: tool.location.clone(),
                items: 0,
                qty: 0,
                amount: 0,
                tools: Vec::new(),
            });
        }
        // last() just pushed or already matched
        if let Some(group) = groups.last_mut() {
            group.items += 1;
            group.qty += i64::from(tool.qty.max(0));
            group.amount += tool.purchase_amount.max(0);
            group.tools.push(tool);
        }
    }

    groups
}

/// The filtered inventory grouped for printing.
#[utoipa::path(
    get,
    path = "/tools/report",
    tag = "Export",
    params(
        ("location" = Option<String>, Query, description = "Exact location"),
        ("status" = Option<String>, Query, description = "Exact status"),
        ("q" = Option<String>, Query, description = "Substring over name and purpose"),
        ("cat_l" = Option<String>, Query, description = "Major category"),
        ("cat_m" = Option<String>, Query, description = "Middle category"),
        ("cat_s" = Option<String>, Query, description = "Minor category"),
        ("unclassified" = Option<String>, Query, description = "\"1\" for uncategorized tools only")
    ),
    responses(
        (status = 200, description = "Report payload", body = ReportResponse),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn report_handler(
    State(state): State<AppState>,
    Query(filter): Query<ToolFilter>,
) -> Result<Json<ReportResponse>, ApiError> {
    let store = state.require_store()?;

    let tools = store.tools.fetch_for_export(&filter).await?;

    let items = tools.len();
    let qty: i64 = tools.iter().map(|t| i64::from(t.qty.max(0))).sum();
    let amount: i64 = tools.iter().map(|t| t.purchase_amount.max(0)).sum();
    let groups = group_by_location(tools);

    Ok(Json(ReportResponse {
        items,
        qty,
        amount,
        groups,
    }))
}
