//! Tool registration and management handlers
//!
//! CRUD over the inventory plus serving stored photos.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use toolscout_core::Fingerprint;
use utoipa::ToSchema;

use crate::db::{CreateTool, Tool, ToolEvent, ToolFilter, ToolImage, ToolListRow, UpdateTool};
use crate::error::ApiError;
use crate::multipart::MultipartFields;
use crate::state::AppState;
use crate::taxonomy::category_tree;

/// Events shown on the detail view
const DETAIL_EVENT_LIMIT: i64 = 50;

/// Response for successful tool registration
#[derive(Serialize, ToSchema)]
pub struct RegisterToolResponse {
    /// The registered tool
    pub tool: Tool,
    /// The stored reference photo
    pub image: ToolImage,
}

/// Response for the tool list endpoint
#[derive(Serialize, ToSchema)]
pub struct ToolListResponse {
    pub count: usize,
    pub tools: Vec<ToolListRow>,
}

/// Full detail of one tool
#[derive(Serialize, ToSchema)]
pub struct ToolDetailResponse {
    pub tool: Tool,
    /// Stored photos, newest first
    pub images: Vec<ToolImage>,
    /// Recent events, newest first
    pub events: Vec<ToolEvent>,
}

/// Response for tool deletion
#[derive(Serialize, ToSchema)]
pub struct DeleteToolResponse {
    pub deleted: bool,
    /// Photo files removed along with the tool
    pub removed_images: usize,
}

fn required_text<'a>(fields: &'a MultipartFields, name: &str) -> Result<&'a str, ApiError> {
    match fields.get_text(name).map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!(
            "Missing required field '{}'",
            name
        ))),
    }
}

fn numeric_field<N: std::str::FromStr>(
    fields: &MultipartFields,
    name: &str,
    default: N,
) -> Result<N, ApiError> {
    match fields.get_text(name).map(str::trim) {
        Some(v) if !v.is_empty() => v
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid numeric field '{}'", name))),
        _ => Ok(default),
    }
}

/// Reject inputs the schema would refuse anyway, so the caller gets a
/// 400 instead of a constraint violation.
fn check_amounts(qty: i32, purchase_amount: i64) -> Result<(), ApiError> {
    if qty < 0 {
        return Err(ApiError::bad_request("Field 'qty' must not be negative"));
    }
    if purchase_amount < 0 {
        return Err(ApiError::bad_request(
            "Field 'purchase_amount' must not be negative",
        ));
    }
    Ok(())
}

/// The category triple must name a path in the fixed taxonomy; empty
/// levels are allowed.
fn check_category(cat_l: &str, cat_m: &str, cat_s: &str) -> Result<(), ApiError> {
    if !category_tree().is_valid_path(cat_l, cat_m, cat_s) {
        return Err(ApiError::bad_request(format!(
            "Unknown category path: '{}' / '{}' / '{}'",
            cat_l, cat_m, cat_s
        )));
    }
    Ok(())
}

/// Register a new tool with its reference photo.
///
/// Accepts multipart/form-data with:
/// - file (required): the reference photo
/// - name, location (required): identifying attributes
/// - purpose, status, qty, purchase_amount, cat_l, cat_m, cat_s (optional)
///
/// The photo is fingerprinted and stored; the fingerprint joins the
/// similarity catalog immediately.
#[utoipa::path(
    post,
    path = "/tools",
    tag = "Tools",
    request_body(
        content_type = "multipart/form-data",
        description = "Reference photo plus tool attributes"
    ),
    responses(
        (status = 200, description = "Tool registered", body = RegisterToolResponse),
        (status = 400, description = "Missing or invalid fields, or undecodable photo"),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn create_tool_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RegisterToolResponse>, ApiError> {
    let fields = MultipartFields::parse(&mut multipart, state.max_file_size).await?;

    let name = required_text(&fields, "name")?.to_string();
    let location = required_text(&fields, "location")?.to_string();
    let purpose = fields.get_text("purpose").unwrap_or("").trim().to_string();
    let status = match fields.get_text("status").map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "정상".to_string(),
    };
    let qty: i32 = numeric_field(&fields, "qty", 1)?;
    let purchase_amount: i64 = numeric_field(&fields, "purchase_amount", 0)?;
    check_amounts(qty, purchase_amount)?;

    let cat_l = fields.get_text("cat_l").unwrap_or("").trim().to_string();
    let cat_m = fields.get_text("cat_m").unwrap_or("").trim().to_string();
    let cat_s = fields.get_text("cat_s").unwrap_or("").trim().to_string();
    check_category(&cat_l, &cat_m, &cat_s)?;

    let file = fields.require_file()?;

    // Fingerprint before touching any storage: an undecodable photo
    // fails the whole registration.
    let fingerprint = Fingerprint::from_image_bytes(&file.data)?;

    let store = state.require_store()?.clone();

    let image_name = state
        .images
        .save(file.file_name.as_deref(), &file.data)
        .await?;

    let tool = store
        .tools
        .create(CreateTool {
            name,
            purpose,
            location,
            status,
            qty,
            purchase_amount,
            cat_l,
            cat_m,
            cat_s,
        })
        .await?;

    let image = store
        .images
        .insert(tool.id, &image_name, &fingerprint.to_hex())
        .await?;

    tracing::info!(tool_id = tool.id, image = %image_name, "Tool registered");

    Ok(Json(RegisterToolResponse { tool, image }))
}

/// List tools, optionally filtered.
///
/// Filters match the list views: exact location/status/category match,
/// substring keyword over name and purpose, and `unclassified=1` for
/// tools with no category at all.
#[utoipa::path(
    get,
    path = "/tools",
    tag = "Tools",
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
        (status = 200, description = "Filtered tool list", body = ToolListResponse),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn list_tools_handler(
    State(state): State<AppState>,
    Query(filter): Query<ToolFilter>,
) -> Result<Json<ToolListResponse>, ApiError> {
    let store = state.require_store()?;

    let tools = store.tools.list(&filter).await?;

    Ok(Json(ToolListResponse {
        count: tools.len(),
        tools,
    }))
}

/// Fetch one tool with its photos and recent events.
#[utoipa::path(
    get,
    path = "/tools/{id}",
    tag = "Tools",
    params(("id" = i64, Path, description = "Tool ID")),
    responses(
        (status = 200, description = "Tool detail", body = ToolDetailResponse),
        (status = 404, description = "No such tool"),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn get_tool_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ToolDetailResponse>, ApiError> {
    let store = state.require_store()?;

    let tool = store
        .tools
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Tool {} not found", id)))?;

    let images = store.images.list_for_tool(id).await?;
    let events = store.events.list_for_tool(id, DETAIL_EVENT_LIMIT).await?;

    Ok(Json(ToolDetailResponse {
        tool,
        images,
        events,
    }))
}

/// Update a tool's attributes.
#[utoipa::path(
    put,
    path = "/tools/{id}",
    tag = "Tools",
    params(("id" = i64, Path, description = "Tool ID")),
    request_body = UpdateTool,
    responses(
        (status = 200, description = "Updated tool", body = Tool),
        (status = 400, description = "Invalid attributes"),
        (status = 404, description = "No such tool"),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn update_tool_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTool>,
) -> Result<Json<Tool>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("Tool name must not be empty"));
    }
    check_amounts(input.qty, input.purchase_amount)?;
    check_category(input.cat_l.trim(), input.cat_m.trim(), input.cat_s.trim())?;

    let store = state.require_store()?;

    let tool = store
        .tools
        .update(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Tool {} not found", id)))?;

    Ok(Json(tool))
}

/// Delete a tool, its photo records, its events, and the stored files.
///
/// Database rows go first; file cleanup failures are logged but do not
/// fail the request, since the rows referencing them are already gone.
#[utoipa::path(
    delete,
    path = "/tools/{id}",
    tag = "Tools",
    params(("id" = i64, Path, description = "Tool ID")),
    responses(
        (status = 200, description = "Tool deleted", body = DeleteToolResponse),
        (status = 404, description = "No such tool"),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn delete_tool_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteToolResponse>, ApiError> {
    let store = state.require_store()?;

    let paths = store
        .tools
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Tool {} not found", id)))?;

    let removed_images = paths.len();
    for path in paths {
        if let Err(e) = state.images.remove(&path).await {
            tracing::warn!(image = %path, error = %e, "Failed to remove photo file");
        }
    }

    tracing::info!(tool_id = id, removed_images, "Tool deleted");

    Ok(Json(DeleteToolResponse {
        deleted: true,
        removed_images,
    }))
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Serve a stored photo by its file name.
#[utoipa::path(
    get,
    path = "/images/{name}",
    tag = "Tools",
    params(("name" = String, Path, description = "Stored photo file name")),
    responses(
        (status = 200, description = "Photo bytes"),
        (status = 400, description = "Invalid image reference"),
        (status = 404, description = "No such photo")
    )
)]
pub async fn get_image_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let data = state.images.read(&name).await?;

    Ok((
        [(header::CONTENT_TYPE, content_type_for(&name))],
        data,
    )
        .into_response())
}
