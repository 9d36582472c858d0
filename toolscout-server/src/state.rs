//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use crate::db::InventoryStore;
use crate::storage::ImageStore;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Inventory repositories; `None` when no database is configured,
    /// in which case data endpoints answer 503
    pub store: Option<Arc<InventoryStore>>,
    /// On-disk store for uploaded tool photos
    pub images: Arc<ImageStore>,
    /// Maximum accepted upload size in bytes
    pub max_file_size: usize,
}

impl AppState {
    /// The inventory store, or 503 when the server runs without one.
    pub fn require_store(&self) -> Result<&Arc<InventoryStore>, crate::error::ApiError> {
        self.store
            .as_ref()
            .ok_or_else(|| crate::error::ApiError::service_unavailable("Inventory store not configured"))
    }
}
