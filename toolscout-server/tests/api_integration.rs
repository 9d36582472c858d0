//! API integration tests for toolscout-server.
//!
//! These tests exercise the HTTP surface with realistic multipart
//! requests through the full router, without a database: endpoints
//! that need the inventory store must answer 503, and input validation
//! must fire before any storage is touched.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use toolscout_server::{AppState, Config, ImageStore};

/// Build the test router: default config (rate limiting off), no
/// inventory store, photos in a throwaway directory.
fn create_test_app() -> Router {
    let config = Config::default();
    let dir = std::env::temp_dir().join(format!("toolscout-test-{}", Uuid::new_v4().simple()));
    let images = Arc::new(ImageStore::new(dir).unwrap());

    let state = AppState {
        store: None,
        images,
        max_file_size: config.max_file_size_mb * 1024 * 1024,
    };

    toolscout_server::create_router_with_config(&config, state)
}

/// A tiny but genuinely decodable PNG
fn sample_png() -> Vec<u8> {
    let img = image::RgbImage::from_fn(8, 8, |x, _| {
        if x < 4 {
            image::Rgb([0u8, 0, 0])
        } else {
            image::Rgb([255u8, 255, 255])
        }
    });
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Helper to create a multipart body with an optional file and text fields
fn create_multipart(file: Option<&[u8]>, fields: &[(&str, &str)]) -> (String, Vec<u8>) {
    let boundary = "----TestBoundary7MA4YWxkTrZu0gW";
    let mut body = Vec::new();

    if let Some(content) = file {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"query.png\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (format!("multipart/form-data; boundary={}", boundary), body)
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ============================================================================
// Health & Readiness
// ============================================================================

#[tokio::test]
async fn test_health_reports_degraded_without_store() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["store_configured"], false);
    assert_eq!(json["service"], "toolscout-server");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_endpoint_returns_ok() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["ready"], true);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_without_store_returns_503() {
    let app = create_test_app();
    let (content_type, body) = create_multipart(None, &[("name", "드릴")]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/search")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = json_body(response).await;
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_search_with_undecodable_photo_returns_400() {
    let app = create_test_app();

    // Decoding happens before the store is consulted, so the missing
    // store must not mask the client error.
    let (content_type, body) =
        create_multipart(Some(b"this is not an image"), &[("mode", "soft")]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/search")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "IMAGE_DECODE_ERROR");
}

#[tokio::test]
async fn test_search_with_valid_photo_but_no_store_returns_503() {
    let app = create_test_app();
    let (content_type, body) = create_multipart(Some(&sample_png()), &[("topk", "3")]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/search")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_search_rejects_unsupported_file_content_type() {
    let app = create_test_app();

    let boundary = "----TestBoundary7MA4YWxkTrZu0gW";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"page.html\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: text/html\r\n\r\n");
    body.extend_from_slice(b"<html></html>\r\n");
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/search")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Tool registration
// ============================================================================

#[tokio::test]
async fn test_create_tool_missing_name_returns_400() {
    let app = create_test_app();
    let (content_type, body) =
        create_multipart(Some(&sample_png()), &[("location", "전기실")]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tools")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_create_tool_missing_photo_returns_400() {
    let app = create_test_app();
    let (content_type, body) = create_multipart(
        None,
        &[("name", "클램프미터"), ("location", "전기실")],
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tools")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_tool_undecodable_photo_returns_400() {
    let app = create_test_app();
    let (content_type, body) = create_multipart(
        Some(b"corrupt bytes"),
        &[("name", "클램프미터"), ("location", "전기실")],
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tools")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "IMAGE_DECODE_ERROR");
}

#[tokio::test]
async fn test_create_tool_unknown_category_returns_400() {
    let app = create_test_app();

    // "측정/시험" belongs to 전기, not 기계, so the path is invalid.
    let (content_type, body) = create_multipart(
        Some(&sample_png()),
        &[
            ("name", "클램프미터"),
            ("location", "전기실"),
            ("cat_l", "기계"),
            ("cat_m", "측정/시험"),
        ],
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tools")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_create_tool_negative_qty_returns_400() {
    let app = create_test_app();
    let (content_type, body) = create_multipart(
        Some(&sample_png()),
        &[
            ("name", "클램프미터"),
            ("location", "전기실"),
            ("qty", "-3"),
        ],
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tools")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_update_tool_negative_amount_returns_400() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/tools/1")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"name": "클램프미터", "location": "전기실", "purchase_amount": -50000}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_update_tool_unknown_category_returns_400() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/tools/1")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"name": "클램프미터", "location": "전기실", "cat_l": "없는분류"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_tool_endpoints_without_store_return_503() {
    for (method, uri) in [
        ("GET", "/tools"),
        ("GET", "/tools/1"),
        ("DELETE", "/tools/1"),
        ("GET", "/tools/1/events"),
        ("GET", "/dashboard"),
        ("GET", "/tools/export/csv"),
        ("GET", "/tools/report"),
    ] {
        let app = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::SERVICE_UNAVAILABLE,
            "{} {} should require the store",
            method,
            uri
        );
    }
}

// ============================================================================
// Feedback
// ============================================================================

#[tokio::test]
async fn test_feedback_without_store_returns_503() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/feedback")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"tool_id": 1, "query_image": "missing.jpg"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_categories_returns_three_level_tree() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert!(json.is_object());
    assert!(json.get("전기").is_some());
    assert!(json["전기"]["측정/시험"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v == "클램프미터"));
}

// ============================================================================
// Stored photos
// ============================================================================

#[tokio::test]
async fn test_image_endpoint_rejects_traversal() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/images/..")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_IMAGE_REFERENCE");
}

#[tokio::test]
async fn test_image_endpoint_missing_file_returns_404() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/images/nope.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["code"], "IMAGE_NOT_FOUND");
}

// ============================================================================
// Misc
// ============================================================================

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/no-such-route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert!(json["paths"].get("/search").is_some());
    assert!(json["paths"].get("/tools").is_some());
}
