//! Category taxonomy handler

use axum::Json;
use serde_json::Value;

use crate::taxonomy::category_tree;

/// The static three-level category tree.
///
/// Major categories map to middle categories, which map to lists of
/// minor labels. Clients use this to populate classification inputs.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "Category tree keyed by major category")
    )
)]
pub async fn categories_handler() -> Json<Value> {
    Json(category_tree().as_json())
}
