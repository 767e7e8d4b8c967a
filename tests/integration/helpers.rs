//! Shared test helpers for integration tests.

use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use animhub_api::AppState;
use animhub_core::config::AppConfig;
use animhub_storage::StorageLayout;

/// Minimal SVG used as upload payload.
pub const LOGO_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect width="10" height="10"/></svg>"#;

const BOUNDARY: &str = "animhub-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
    /// Storage root; removed on drop
    pub dir: TempDir,
}

impl TestApp {
    /// App with the default configuration rooted in a temporary directory
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// App whose renderer is `sh -c script`.
    ///
    /// Inside the script `$3` is the output file name and `$5` the media dir.
    pub async fn with_renderer(script: &str, timeout_seconds: u64) -> Self {
        let script = script.to_string();
        Self::with_config(move |config| {
            config.render.command = "sh".to_string();
            config.render.extra_args = vec!["-c".to_string(), script, "sh".to_string()];
            config.render.timeout_seconds = timeout_seconds;
        })
        .await
    }

    /// App with a customized configuration
    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.storage.root = dir.path().to_path_buf();
        customize(&mut config);

        let layout = StorageLayout::from_config(&config.storage).expect("Failed to resolve layout");
        layout.ensure_dirs().await.expect("Failed to create dirs");

        let state = AppState::new(config, layout).expect("Failed to build state");
        let router = animhub_api::build_app(state.clone());

        Self { router, state, dir }
    }

    /// Resolved working directories
    pub fn layout(&self) -> &StorageLayout {
        &self.state.layout
    }

    /// Write a file into the item or block library
    pub fn add_library_file(&self, dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("Failed to write library file");
        path
    }

    /// Number of entries directly under `dir`
    pub fn count_entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|r| r.count()).unwrap_or(0)
    }

    /// Send a JSON request (or no body)
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        let body = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        self.send(req.body(Body::from(body)).expect("Failed to build request"))
            .await
    }

    /// Upload `content` as multipart field `file` named `filename`
    pub async fn upload(&self, filename: &str, content: &str) -> TestResponse {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: image/svg+xml\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        self.multipart(body).await
    }

    /// Send a raw multipart body
    pub async fn multipart(&self, body: String) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Upload the test logo and return `(file_id, filename)`
    pub async fn upload_logo(&self) -> (String, String) {
        let response = self.upload("logo.svg", LOGO_SVG).await;
        assert_eq!(response.status, StatusCode::OK, "Upload failed: {:?}", response.body);
        (
            response.body["file_id"].as_str().expect("file_id").to_string(),
            response.body["filename"].as_str().expect("filename").to_string(),
        )
    }

    /// Send an arbitrary request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            bytes,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when not JSON
    pub body: Value,
    /// Raw body
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// Header value as a string, empty when absent
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// Whether `pid` is still running; zombies count as gone.
#[cfg(target_os = "linux")]
pub fn process_alive(pid: i32) -> bool {
    std::fs::read_to_string(format!("/proc/{pid}/stat"))
        .ok()
        .and_then(|stat| {
            let (_, rest) = stat.rsplit_once(')')?;
            rest.trim_start().chars().next()
        })
        .is_some_and(|state| state != 'Z' && state != 'X')
}
