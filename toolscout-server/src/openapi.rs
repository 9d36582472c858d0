//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3.0 specification for the inventory API.

use utoipa::OpenApi;

use crate::db::{
    CategorySummary, LocationSummary, StatusSummary, Tool, ToolEvent, ToolImage, ToolListRow,
    Totals, UpdateTool,
};
use crate::handlers::{
    AddEventRequest, DashboardResponse, DeleteToolResponse, EventListResponse, FeedbackRequest,
    FeedbackResponse, HealthResponse, ReadyResponse, RegisterToolResponse, ReportGroup,
    ReportResponse, SearchMatch, SearchResponse, ToolDetailResponse, ToolListResponse,
};

/// Facility tool inventory API - OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ToolScout API",
        version = "0.1.0",
        description = r#"
## Photo-first facility tool inventory

Field technicians register tools with a reference photo and find them
again by snapping a picture:

- Every photo is reduced to a **64-bit average-hash fingerprint**
- Lookup ranks the whole catalog by **Hamming distance**
- Text criteria either **filter hard** (strict mode) or **lower the
  effective distance** as a bonus (soft mode)
- Confirming a hit feeds the query photo back into the catalog, so
  recognition improves with use

The rest is plain inventory bookkeeping: locations, statuses, a
three-level category tree, checkout/return/inspection events, CSV
export, and printable reports.
"#,
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        crate::handlers::tools::create_tool_handler,
        crate::handlers::tools::list_tools_handler,
        crate::handlers::tools::get_tool_handler,
        crate::handlers::tools::update_tool_handler,
        crate::handlers::tools::delete_tool_handler,
        crate::handlers::tools::get_image_handler,
        crate::handlers::search::search_handler,
        crate::handlers::feedback::feedback_handler,
        crate::handlers::events::add_event_handler,
        crate::handlers::events::list_events_handler,
        crate::handlers::dashboard::dashboard_handler,
        crate::handlers::export::export_csv_handler,
        crate::handlers::export::report_handler,
        crate::handlers::categories::categories_handler,
        crate::handlers::health::health,
        crate::handlers::health::ready,
    ),
    components(schemas(
        Tool,
        ToolListRow,
        ToolImage,
        ToolEvent,
        UpdateTool,
        Totals,
        StatusSummary,
        LocationSummary,
        CategorySummary,
        RegisterToolResponse,
        ToolListResponse,
        ToolDetailResponse,
        DeleteToolResponse,
        SearchMatch,
        SearchResponse,
        FeedbackRequest,
        FeedbackResponse,
        AddEventRequest,
        EventListResponse,
        DashboardResponse,
        ReportGroup,
        ReportResponse,
        HealthResponse,
        ReadyResponse,
    )),
    tags(
        (name = "Tools", description = "Registration and inventory management"),
        (name = "Search", description = "Photo similarity search and feedback"),
        (name = "Events", description = "Checkout, return, and inspection log"),
        (name = "Dashboard", description = "Inventory aggregates"),
        (name = "Export", description = "CSV download and printable reports"),
        (name = "Categories", description = "Static classification taxonomy"),
        (name = "Health", description = "Service monitoring")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        let json = spec.to_json().unwrap();
        assert!(json.contains("/search"));
        assert!(json.contains("/tools"));
        assert!(json.contains("SearchResponse"));
    }
}
