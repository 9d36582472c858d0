//! ToolScout Server Library - REST API for the photo-first tool inventory
//!
//! This library exposes the server components for use in integration tests.
//! The main binary uses these same components.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod multipart;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod storage;
pub mod taxonomy;
pub mod validation;

pub use config::Config;
pub use db::{
    CatalogRow, CategorySummary, CreateEvent, CreateTool, EventRepository, InventoryStore,
    LocationSummary, StatusSummary, Tool, ToolEvent, ToolFilter, ToolImage, ToolImageRepository,
    ToolListRow, ToolRepository, Totals, UpdateTool,
};
pub use error::ApiError;
pub use openapi::ApiDoc;
pub use routes::create_router_with_config;
pub use state::AppState;
pub use storage::{ImageStore, StorageError};
