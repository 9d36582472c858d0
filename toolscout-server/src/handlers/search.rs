//! Similarity search handler
//!
//! Handles POST /search requests: photo similarity ranking when a photo
//! is attached, plain criteria filtering when not.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use toolscout_core::{filter_entries, rank, Candidate, Fingerprint, RawCriteria, SearchCriteria};
use utoipa::ToSchema;

use crate::db::CatalogRow;
use crate::error::ApiError;
use crate::multipart::MultipartFields;
use crate::state::AppState;

/// Row budget for the criteria-only path. The similarity path scans
/// the whole catalog; the no-photo path only looks at recent stock.
const RECENT_SCAN_LIMIT: i64 = 800;

/// One search hit.
///
/// `hamming` and `adjusted` are present only on the photo path; the
/// criteria-only path returns hits in recency order without scores.
#[derive(Serialize, ToSchema)]
pub struct SearchMatch {
    pub tool_id: i64,
    pub name: String,
    pub purpose: String,
    pub location: String,
    pub status: String,
    pub qty: u32,
    pub purchase_amount: u64,
    pub cat_l: String,
    pub cat_m: String,
    pub cat_s: String,
    /// Raw Hamming distance in [0, 64]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 7)]
    pub hamming: Option<u32>,
    /// Distance minus soft bonus; may be negative
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 3)]
    pub adjusted: Option<i64>,
    /// Stored photo backing this hit, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Response for a search query.
#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    /// Whether any hits were found
    pub found: bool,
    /// Number of hits
    pub count: usize,
    /// Stored name of the query photo, for the feedback flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_image: Option<String>,
    /// Hits, closest first on the photo path, newest first otherwise
    pub matches: Vec<SearchMatch>,
}

fn criteria_from_fields(fields: &MultipartFields) -> SearchCriteria {
    SearchCriteria::from_raw(RawCriteria {
        keyword: fields.get_text("name"),
        location: fields.get_text("location"),
        status: fields.get_text("status"),
        cat_l: fields.get_text("cat_l"),
        cat_m: fields.get_text("cat_m"),
        cat_s: fields.get_text("cat_s"),
        min_qty: fields.get_text("min_qty"),
        max_amount: fields.get_text("max_amt"),
        mode: fields.get_text("mode"),
        top_k: fields.get_text("topk"),
    })
}

/// Build ranking candidates from catalog rows, dropping rows whose
/// stored fingerprint no longer decodes.
fn candidates_from_catalog(rows: &[CatalogRow]) -> Vec<Candidate> {
    rows.iter()
        .filter_map(|row| match Fingerprint::from_hex(&row.ahash) {
            Ok(fingerprint) => Some(Candidate {
                tool_id: row.tool_id,
                attributes: row.attributes(),
                fingerprint,
                image_ref: row.image_path.clone(),
            }),
            Err(e) => {
                tracing::warn!(tool_id = row.tool_id, image = %row.image_path, error = %e,
                    "Skipping catalog row with bad fingerprint");
                None
            }
        })
        .collect()
}

/// Search the inventory.
///
/// Accepts multipart/form-data with an optional photo ("file") and the
/// criteria fields (name, location, status, cat_l, cat_m, cat_s,
/// min_qty, max_amt, mode, topk). All criteria parse leniently: blank
/// or malformed values fall back to their defaults instead of failing.
///
/// With a photo, every stored photo is scored by Hamming distance,
/// filtered (strict) or rewarded (soft), and the top-K hits return with
/// their scores plus the stored name of the query photo. Without one,
/// the criteria alone filter recently registered tools.
#[utoipa::path(
    post,
    path = "/search",
    tag = "Search",
    request_body(
        content_type = "multipart/form-data",
        description = "Optional query photo plus search criteria"
    ),
    responses(
        (status = 200, description = "Search result", body = SearchResponse),
        (status = 400, description = "Undecodable photo"),
        (status = 503, description = "Inventory store not configured")
    )
)]
pub async fn search_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SearchResponse>, ApiError> {
    let fields = MultipartFields::parse(&mut multipart, state.max_file_size).await?;
    let criteria = criteria_from_fields(&fields);

    let Some(file) = fields.get_file() else {
        return criteria_search(&state, &criteria).await;
    };

    // Decode before anything persists: a corrupt photo is the caller's
    // error, not a half-done search.
    let query = Fingerprint::from_image_bytes(&file.data)?;

    let store = state.require_store()?.clone();

    // The query photo is kept so a feedback confirmation can promote it
    // into the catalog later.
    let query_image = state
        .images
        .save(file.file_name.as_deref(), &file.data)
        .await?;

    let catalog = store.images.snapshot().await?;
    let candidates = candidates_from_catalog(&catalog);
    let hits = rank(query, &criteria, &candidates);

    tracing::debug!(
        catalog = candidates.len(),
        hits = hits.len(),
        mode = ?criteria.mode,
        "Photo search complete"
    );

    let matches: Vec<SearchMatch> = hits
        .into_iter()
        .map(|hit| SearchMatch {
            tool_id: hit.tool_id,
            name: hit.attributes.name,
            purpose: hit.attributes.purpose,
            location: hit.attributes.location,
            status: hit.attributes.status,
            qty: hit.attributes.qty,
            purchase_amount: hit.attributes.purchase_amount,
            cat_l: hit.attributes.cat_l,
            cat_m: hit.attributes.cat_m,
            cat_s: hit.attributes.cat_s,
            hamming: Some(hit.hamming),
            adjusted: Some(hit.adjusted),
            image: Some(hit.image_ref),
        })
        .collect();

    Ok(Json(SearchResponse {
        found: !matches.is_empty(),
        count: matches.len(),
        query_image: Some(query_image),
        matches,
    }))
}

/// The no-photo path: criteria filter over recent tools, recency order,
/// no truncation.
async fn criteria_search(
    state: &AppState,
    criteria: &SearchCriteria,
) -> Result<Json<SearchResponse>, ApiError> {
    let store = state.require_store()?;

    let recent = store.tools.recent(RECENT_SCAN_LIMIT).await?;

    // Pair each row with its attribute tuple once, so the evaluator can
    // borrow instead of recomputing per criterion.
    let paired: Vec<_> = recent.into_iter().map(|row| (row.attributes(), row)).collect();
    let filtered = filter_entries(paired, criteria, |(attrs, _)| attrs);

    let matches: Vec<SearchMatch> = filtered
        .into_iter()
        .map(|(_, row)| SearchMatch {
            tool_id: row.id,
            name: row.name,
            purpose: row.purpose,
            location: row.location,
            status: row.status,
            qty: row.qty.max(0) as u32,
            purchase_amount: row.purchase_amount.max(0) as u64,
            cat_l: row.cat_l,
            cat_m: row.cat_m,
            cat_s: row.cat_s,
            hamming: None,
            adjusted: None,
            image: row.ref_image,
        })
        .collect();

    Ok(Json(SearchResponse {
        found: !matches.is_empty(),
        count: matches.len(),
        query_image: None,
        matches,
    }))
}
