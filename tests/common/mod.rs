//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use sheet_pager::config::Config;
use sheet_pager::services::records::RecordCollection;
use sheet_pager::services::workbook::{SheetSource, SourceError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

/// Token every test configuration uses
pub const TOKEN: &str = "test-token";

/// Write a workbook with an `Orders` sheet of `rows` data rows and a `Notes` sheet
///
/// Row `i` (1-based) holds `Id = i`, `Customer = "Customer i"`, `Amount = i * 1.5`.
pub fn write_orders(path: &Path, sheet: &str, rows: u32) {
    let mut workbook = Workbook::new();
    let orders = workbook.add_worksheet();
    orders.set_name(sheet).unwrap();
    orders.write_string(0, 0, "Id").unwrap();
    orders.write_string(0, 1, "Customer").unwrap();
    orders.write_string(0, 2, "Amount").unwrap();
    for i in 1..=rows {
        orders.write_number(i, 0, i as f64).unwrap();
        orders.write_string(i, 1, format!("Customer {}", i)).unwrap();
        orders.write_number(i, 2, i as f64 * 1.5).unwrap();
    }

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "Note").unwrap();
    notes.write_string(1, 0, "hello").unwrap();

    workbook.save(path).unwrap();
}

/// Configuration rooted at `data_dir` with optional overrides
pub fn test_config(data_dir: &Path, overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("API_KEY".to_string(), TOKEN.to_string());
    vars.insert(
        "DATA_DIR".to_string(),
        data_dir.to_string_lossy().to_string(),
    );
    vars.insert("DATA_FILE".to_string(), "orders.xlsx".to_string());
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

/// Send a GET request and return the status and raw body
pub async fn get_raw(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Send a GET request and parse the JSON body
pub async fn get_json(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let (status, body) = get_raw(app, uri, token).await;
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("Body of {} is not JSON ({}): {:?}", uri, e, body));
    (status, json)
}

/// Source that counts every access and never has any data
#[derive(Default)]
pub struct RecordingSource {
    /// Calls to any method
    pub calls: AtomicUsize,
}

impl RecordingSource {
    /// Number of calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SheetSource for RecordingSource {
    async fn list_files(&self) -> Result<Vec<String>, SourceError> {
        self.touch();
        Ok(Vec::new())
    }

    async fn contains(&self, _file: &str) -> bool {
        self.touch();
        true
    }

    async fn sheet_names(&self, _file: &str) -> Result<Vec<String>, SourceError> {
        self.touch();
        Ok(Vec::new())
    }

    async fn load_sheet(
        &self,
        _file: &str,
        _sheet: Option<&str>,
    ) -> Result<RecordCollection, SourceError> {
        self.touch();
        Ok(Vec::new())
    }
}
