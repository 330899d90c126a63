//! Workbook listing API handlers

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Response for listing workbook files
#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    /// Workbook file names, sorted
    pub files: Vec<String>,
}

/// Response for listing the sheets of a workbook
#[derive(Debug, Serialize)]
pub struct ListSheetsResponse {
    /// Sheet names in workbook order
    pub sheets: Vec<String>,
}

/// GET /files - List workbook files in the data directory
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListFilesResponse>, AppError> {
    let files = state.source.list_files().await?;
    Ok(Json(ListFilesResponse { files }))
}

/// GET /file/:file/sheets - List sheet names of one workbook
pub async fn list_sheets(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ListSheetsResponse>, AppError> {
    let Path(file) = path?;
    let sheets = state.source.sheet_names(&file).await?;
    Ok(Json(ListSheetsResponse { sheets }))
}
