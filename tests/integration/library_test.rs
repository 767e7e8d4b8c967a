//! Asset library listing, serving, and selection.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

const DIRT: &str = r#"<svg viewBox="0 0 16 16"><rect width="16" height="16"/></svg>"#;

#[tokio::test]
async fn test_listings_are_sorted_and_humanized() {
    let app = TestApp::new().await;
    let items = app.layout().items.clone();
    let blocks = app.layout().blocks.clone();
    app.add_library_file(&items, "Diamond_Sword.svg", "<svg/>");
    app.add_library_file(&items, "GoldenApple.svg", "<svg/>");
    app.add_library_file(&items, "notes.txt", "ignored");
    app.add_library_file(&blocks, "Crafting_Table.svg", DIRT);

    let response = app.request("GET", "/api/items", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!([
            {"filename": "Diamond_Sword.svg", "name": "Diamond Sword", "type": "item"},
            {"filename": "GoldenApple.svg", "name": "Golden Apple", "type": "item"},
        ])
    );

    let all = app.request("GET", "/api/minecraft", None).await;
    let names: Vec<_> = all
        .body
        .as_array()
        .expect("array")
        .iter()
        .map(|e| e["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, ["Crafting Table", "Diamond Sword", "Golden Apple"]);
    assert_eq!(all.body[0]["type"], "block");
}

#[tokio::test]
async fn test_empty_library_lists_nothing() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/blocks", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_serve_block_injects_size() {
    let app = TestApp::new().await;
    let blocks = app.layout().blocks.clone();
    app.add_library_file(&blocks, "Dirt.svg", DIRT);

    let response = app.request("GET", "/api/blocks/Dirt.svg", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/svg+xml");
    assert_eq!(response.header("cache-control"), "public, max-age=300");
    let body = String::from_utf8(response.bytes).expect("utf8");
    assert!(body.starts_with(r#"<svg width="32" height="32" viewBox"#));
}

#[tokio::test]
async fn test_serve_item_unchanged() {
    let app = TestApp::new().await;
    let items = app.layout().items.clone();
    app.add_library_file(&items, "Apple.svg", DIRT);

    let response = app.request("GET", "/api/items/Apple.svg", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, DIRT.as_bytes());
}

#[tokio::test]
async fn test_serve_asset_errors() {
    let app = TestApp::new().await;

    let missing = app.request("GET", "/api/items/Missing.svg", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["error"], "Item not found");

    let wrong_type = app.request("GET", "/api/blocks/Dirt.png", None).await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);

    let traversal = app
        .request("GET", "/api/items/..%2F..%2Fsecret.svg", None)
        .await;
    assert_eq!(traversal.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_select_library_asset() {
    let app = TestApp::new().await;
    let blocks = app.layout().blocks.clone();
    app.add_library_file(&blocks, "Dirt.svg", DIRT);

    let response = app
        .request(
            "POST",
            "/api/upload-minecraft-item",
            Some(json!({"filename": "Dirt.svg", "type": "block"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["is_minecraft_item"], true);
    assert_eq!(response.body["message"], "Minecraft block selected successfully!");

    let file_id = response.body["file_id"].as_str().expect("file_id");
    let copy = app.layout().uploads.join(format!("{file_id}_Dirt.svg"));
    assert_eq!(std::fs::read_to_string(copy).expect("copy"), DIRT);
    assert!(blocks.join("Dirt.svg").exists());
}

#[tokio::test]
async fn test_select_library_asset_errors() {
    let app = TestApp::new().await;

    let no_name = app
        .request("POST", "/api/upload-minecraft-item", Some(json!({})))
        .await;
    assert_eq!(no_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_name.body["error"], "No filename provided");

    let missing = app
        .request(
            "POST",
            "/api/upload-minecraft-item",
            Some(json!({"filename": "Ghost.svg"})),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let traversal = app
        .request(
            "POST",
            "/api/upload-minecraft-item",
            Some(json!({"filename": "../secret.svg", "type": "item"})),
        )
        .await;
    assert_eq!(traversal.status, StatusCode::BAD_REQUEST);
    assert_eq!(TestApp::count_entries(&app.layout().uploads), 0);
}
