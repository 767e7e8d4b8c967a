//! End-to-end render flows against a scripted stand-in renderer.
#![cfg(unix)]

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

/// Writes the video where the real renderer would, under the media dir.
const RENDER_OK: &str =
    r#"mkdir -p "$5/videos/scene/1080p60" && printf 'fake-video' > "$5/videos/scene/1080p60/$3""#;

async fn generate(app: &TestApp, body: serde_json::Value) -> crate::helpers::TestResponse {
    app.request("POST", "/api/generate", Some(body)).await
}

#[tokio::test]
async fn test_upload_generate_download() {
    let app = TestApp::with_renderer(RENDER_OK, 10).await;
    let (file_id, filename) = app.upload_logo().await;

    let response = generate(
        &app,
        json!({"file_id": file_id, "filename": filename, "duration": 3}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["file_id"], file_id.as_str());
    let video_path = response.body["video_path"].as_str().expect("video_path");
    assert!(video_path.ends_with(&format!("{file_id}_animation.mp4")));
    let script = response.body["script_content"].as_str().expect("script");
    assert!(script.contains("m.scale(1.0)"));

    let descriptor = app.layout().descriptors.join(format!("{file_id}_animation.py"));
    assert!(descriptor.exists());

    let download = app
        .request("GET", &format!("/api/download/{file_id}"), None)
        .await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.bytes, b"fake-video");
    assert_eq!(download.header("content-type"), "video/mp4");
    assert_eq!(
        download.header("content-disposition"),
        format!("attachment; filename=\"{file_id}_animation.mp4\"")
    );

    let preview = app
        .request("GET", &format!("/api/preview/{file_id}"), None)
        .await;
    assert_eq!(preview.status, StatusCode::OK);
    assert!(preview.header("content-disposition").starts_with("inline"));
}

#[tokio::test]
async fn test_library_asset_renders_enlarged() {
    let app = TestApp::with_renderer(RENDER_OK, 10).await;
    let items = app.layout().items.clone();
    app.add_library_file(&items, "Apple.svg", "<svg viewBox=\"0 0 16 16\"/>");

    let selected = app
        .request(
            "POST",
            "/api/upload-minecraft-item",
            Some(json!({"filename": "Apple.svg"})),
        )
        .await;
    assert_eq!(selected.status, StatusCode::OK);

    let response = generate(
        &app,
        json!({
            "file_id": selected.body["file_id"],
            "filename": selected.body["filename"],
            "is_minecraft_item": true,
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let script = response.body["script_content"].as_str().expect("script");
    assert!(script.contains("m.scale(2.0)"));
}

#[tokio::test]
async fn test_renderer_failure_reports_stderr() {
    let app = TestApp::with_renderer("echo 'scene exploded' >&2; exit 2", 10).await;
    let (file_id, filename) = app.upload_logo().await;

    let response = generate(&app, json!({"file_id": file_id, "filename": filename})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["code"], "RENDER_FAILURE");
    assert_eq!(response.body["exit_code"], 2);
    assert!(
        response.body["details"]
            .as_str()
            .unwrap_or_default()
            .contains("scene exploded")
    );

    let download = app
        .request("GET", &format!("/api/download/{file_id}"), None)
        .await;
    assert_eq!(download.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_success_without_artifact() {
    let app = TestApp::with_renderer("exit 0", 10).await;
    let (file_id, filename) = app.upload_logo().await;

    let response = generate(&app, json!({"file_id": file_id, "filename": filename})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Generated video not found");
}

#[tokio::test]
async fn test_renderer_timeout() {
    let app = TestApp::with_renderer("exec sleep 30", 1).await;
    let (file_id, filename) = app.upload_logo().await;

    let started = Instant::now();
    let response = generate(&app, json!({"file_id": file_id, "filename": filename})).await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["code"], "RENDER_TIMEOUT");
    assert_eq!(response.body["timeout_seconds"], 1);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_renderer_timeout_leaves_no_descendants() {
    let app = TestApp::with_renderer(
        r#"sleep 30 & echo $! > "$5/grandchild.pid"; wait"#,
        1,
    )
    .await;
    let (file_id, filename) = app.upload_logo().await;

    let response = generate(&app, json!({"file_id": file_id, "filename": filename})).await;
    assert_eq!(response.body["code"], "RENDER_TIMEOUT");

    let pid: i32 = std::fs::read_to_string(app.layout().outputs.join("grandchild.pid"))
        .expect("pid file")
        .trim()
        .parse()
        .expect("pid");
    let mut alive = true;
    for _ in 0..40 {
        alive = crate::helpers::process_alive(pid);
        if !alive {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(!alive, "renderer grandchild {pid} survived the timeout");
}

#[tokio::test]
async fn test_invalid_parameters_never_reach_renderer() {
    let app = TestApp::with_renderer(RENDER_OK, 10).await;
    let (file_id, filename) = app.upload_logo().await;

    let response = generate(
        &app,
        json!({"file_id": file_id, "filename": filename, "duration": -1}),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(TestApp::count_entries(&app.layout().descriptors), 0);
}
