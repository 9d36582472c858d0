//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod categories;
pub mod dashboard;
pub mod events;
pub mod export;
pub mod feedback;
pub mod health;
pub mod search;
pub mod tools;

pub use crate::state::AppState;
pub use categories::categories_handler;
pub use dashboard::{dashboard_handler, DashboardResponse};
pub use events::{
    add_event_handler, list_events_handler, AddEventRequest, EventListQuery, EventListResponse,
};
pub use export::{export_csv_handler, report_handler, ReportGroup, ReportResponse};
pub use feedback::{feedback_handler, FeedbackRequest, FeedbackResponse};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use search::{search_handler, SearchMatch, SearchResponse};
pub use tools::{
    create_tool_handler, delete_tool_handler, get_image_handler, get_tool_handler,
    list_tools_handler, update_tool_handler, DeleteToolResponse, RegisterToolResponse,
    ToolDetailResponse, ToolListResponse,
};
