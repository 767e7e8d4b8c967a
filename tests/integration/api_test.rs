//! Upload, status, static, and error-path tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use crate::helpers::{LOGO_SVG, TestApp};

#[tokio::test]
async fn test_status_reports_running() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/status", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "running");
    assert_eq!(response.body["cors"], "enabled");
}

#[tokio::test]
async fn test_upload_svg_stores_prefixed_file() {
    let app = TestApp::new().await;

    let response = app.upload("My Logo.svg", LOGO_SVG).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["is_minecraft_item"], false);
    assert_eq!(response.body["filename"], "My_Logo.svg");

    let file_id = response.body["file_id"].as_str().expect("file_id");
    let stored = app.layout().uploads.join(format!("{file_id}_My_Logo.svg"));
    let content = std::fs::read_to_string(stored).expect("stored upload");
    assert_eq!(content, LOGO_SVG);
}

#[tokio::test]
async fn test_upload_ids_are_unique() {
    let app = TestApp::new().await;

    let (first, _) = app.upload_logo().await;
    let (second, _) = app.upload_logo().await;

    assert_ne!(first, second);
    assert_eq!(TestApp::count_entries(&app.layout().uploads), 2);
}

#[tokio::test]
async fn test_upload_rejects_other_extensions() {
    let app = TestApp::new().await;

    let response = app.upload("photo.png", "not an svg").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION");
    assert!(
        response.body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("SVG")
    );
    assert_eq!(TestApp::count_entries(&app.layout().uploads), 0);
}

#[tokio::test]
async fn test_upload_traversal_name_is_rejected() {
    let app = TestApp::new().await;

    let response = app.upload("../../etc/passwd", "root:x:0:0").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(TestApp::count_entries(&app.layout().uploads), 0);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = TestApp::new().await;

    let body = "--animhub-test-boundary\r\n\
                Content-Disposition: form-data; name=\"other\"\r\n\r\n\
                value\r\n\
                --animhub-test-boundary--\r\n"
        .to_string();
    let response = app.multipart(body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No file provided");
}

#[tokio::test]
async fn test_upload_with_empty_filename() {
    let app = TestApp::new().await;

    let response = app.upload("", LOGO_SVG).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No file selected");
}

#[tokio::test]
async fn test_upload_requires_multipart() {
    let app = TestApp::new().await;

    let response = app.request("POST", "/api/upload", Some(json!({}))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_missing_information() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/generate", Some(json!({"file_id": "abc"})))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Missing file information");
}

#[tokio::test]
async fn test_generate_invalid_json() {
    let app = TestApp::new().await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION");
}

#[tokio::test]
async fn test_generate_unknown_upload() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/generate",
            Some(json!({
                "file_id": "2f1c6f0e-8a8e-4c47-9a53-1f0e2b7d4c11",
                "filename": "logo.svg",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "SVG file not found");
}

#[tokio::test]
async fn test_generate_rejects_malformed_identifier() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/generate",
            Some(json!({"file_id": "../../etc", "filename": "logo.svg"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_rejects_unsanitized_filename() {
    let app = TestApp::new().await;
    let (file_id, _) = app.upload_logo().await;

    let response = app
        .request(
            "POST",
            "/api/generate",
            Some(json!({"file_id": file_id, "filename": "../../etc/passwd"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_rejects_non_numeric_duration() {
    let app = TestApp::new().await;
    let (file_id, filename) = app.upload_logo().await;

    let response = app
        .request(
            "POST",
            "/api/generate",
            Some(json!({"file_id": file_id, "filename": filename, "duration": "forever"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_unknown_video() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/api/download/2f1c6f0e-8a8e-4c47-9a53-1f0e2b7d4c11",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Video file not found");
}

#[tokio::test]
async fn test_preview_garbage_identifier() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/preview/not-an-id", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Video file not found");
}

#[tokio::test]
async fn test_index_and_static_files() {
    let app = TestApp::new().await;
    std::fs::write(app.dir.path().join("index.html"), "<html>home</html>").expect("index");
    std::fs::write(app.dir.path().join("app.js"), "console.log(1)").expect("js");

    let index = app.request("GET", "/", None).await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(index.header("content-type").starts_with("text/html"));
    assert_eq!(index.bytes, b"<html>home</html>");

    let script = app.request("GET", "/app.js", None).await;
    assert_eq!(script.status, StatusCode::OK);
    assert_eq!(script.bytes, b"console.log(1)");

    let missing = app.request("GET", "/nope.css", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_traversal_is_rejected() {
    let app = TestApp::new().await;

    let raw = app.request("GET", "/../../etc/passwd", None).await;
    assert_eq!(raw.status, StatusCode::BAD_REQUEST);

    let encoded = app.request("GET", "/%2e%2e/%2e%2e/etc/passwd", None).await;
    assert_eq!(encoded.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_responses_carry_cors_headers() {
    let app = TestApp::new().await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/status")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .expect("request");
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("access-control-allow-origin"), "*");
}
