//! Tests for the fixed data route in lazy and eager source modes

mod common;

use axum::http::StatusCode;
use common::{get_json, get_raw, test_config, write_orders, TOKEN};
use serde_json::Value;
use sheet_pager::api::router;
use sheet_pager::services::workbook::SourceError;
use sheet_pager::state::AppState;
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn test_fixed_route_envelope() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_orders(&temp_dir.path().join("orders.xlsx"), "Orders", 60);
    let config = test_config(temp_dir.path(), &[]);
    let app = router(Arc::new(AppState::from_config(&config).await.unwrap()));

    let (status, body) = get_json(&app, "/data", Some(TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], 60);
    assert_eq!(body["next_page"], "/data?page=2");
    assert!(body.get("file").is_none());
    assert!(body.get("sheet").is_none());

    let (_, body) = get_json(&app, "/data?page=3", Some(TOKEN)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["next_page"], Value::Null);
}

#[tokio::test]
async fn test_fixed_route_custom_path_and_sheet() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_orders(&temp_dir.path().join("orders.xlsx"), "Orders", 60);
    let config = test_config(
        temp_dir.path(),
        &[("DATA_ROUTE", "/CustomerOrders"), ("DATA_SHEET", "Notes")],
    );
    let app = router(Arc::new(AppState::from_config(&config).await.unwrap()));

    let (status, body) = get_json(&app, "/CustomerOrders", Some(TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], 1);
    assert_eq!(body["data"][0]["Note"], "hello");

    let (status, _) = get_raw(&app, "/data", Some(TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lazy_mode_sees_file_changes() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("orders.xlsx");
    write_orders(&path, "Orders", 5);
    let config = test_config(temp_dir.path(), &[("SOURCE_MODE", "lazy")]);
    let app = router(Arc::new(AppState::from_config(&config).await.unwrap()));

    let (_, body) = get_json(&app, "/data", Some(TOKEN)).await;
    assert_eq!(body["total_rows"], 5);

    write_orders(&path, "Orders", 7);
    let (_, body) = get_json(&app, "/data", Some(TOKEN)).await;
    assert_eq!(body["total_rows"], 7);

    std::fs::remove_file(&path).unwrap();
    let (status, body) = get_json(&app, "/data", Some(TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "File not found");
}

#[tokio::test]
async fn test_eager_mode_serves_startup_snapshot() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("orders.xlsx");
    write_orders(&path, "Orders", 30);
    let config = test_config(temp_dir.path(), &[("SOURCE_MODE", "eager")]);
    let app = router(Arc::new(AppState::from_config(&config).await.unwrap()));

    std::fs::remove_file(&path).unwrap();

    let (status, body) = get_json(&app, "/data?page=2", Some(TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], 30);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let (status, _) = get_json(&app, "/data?page=0", Some(TOKEN)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_eager_mode_refuses_to_start_without_source() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let config = test_config(temp_dir.path(), &[("SOURCE_MODE", "eager")]);

    let result = AppState::from_config(&config).await;
    assert!(matches!(result, Err(SourceError::NotFound(_))));
}

#[tokio::test]
async fn test_eager_mode_refuses_to_start_with_corrupt_source() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(temp_dir.path().join("orders.xlsx"), "garbage").unwrap();
    let config = test_config(temp_dir.path(), &[("SOURCE_MODE", "eager")]);

    let result = AppState::from_config(&config).await;
    assert!(matches!(result, Err(SourceError::Decode(_))));
}
