//! Paginated sheet API handlers
//!
//! Both paginated routes share one code path; they differ only in how the
//! records are obtained and which names go into the envelope.

use crate::error::AppError;
use crate::services::pagination::{paginate, parse_page_param, quote_segment, PageEnvelope};
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Raw query pairs in request order
///
/// `page` is kept as text so malformed values produce the JSON error body
/// rather than the extractor's plain-text rejection. Repeated keys are allowed.
pub type QueryPairs = Vec<(String, String)>;

/// First `page` value of the query string, if any
fn page_value(query: &[(String, String)]) -> Option<&str> {
    query
        .iter()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.as_str())
}

/// GET /file/:file/sheet/:sheet - One page of rows from a named sheet
pub async fn file_sheet_page(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
    Query(query): Query<QueryPairs>,
) -> Result<Response, AppError> {
    let Path((file, sheet)) = path?;
    if !state.source.contains(&file).await {
        return Err(AppError::NotFound("File not found".to_string()));
    }
    let page_number = parse_page_param(page_value(&query))?;

    let records = state.source.load_sheet(&file, Some(&sheet)).await?;
    let page = paginate(&records, page_number, state.per_page)?;

    let base_path = format!("/file/{}/sheet/{}", quote_segment(&file), quote_segment(&sheet));
    let envelope = PageEnvelope::new(page, &base_path).with_source(&file, &sheet);
    Ok(Json(envelope).into_response())
}

/// GET <DATA_ROUTE> - One page of rows from the configured fixed source
pub async fn fixed_source_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> Result<Response, AppError> {
    let fixed = &state.fixed;
    if fixed.snapshot.is_none() && !state.source.contains(&fixed.file).await {
        return Err(AppError::NotFound("File not found".to_string()));
    }
    let page_number = parse_page_param(page_value(&query))?;

    let records = state.fixed_records().await?;
    let page = paginate(records.as_slice(), page_number, state.per_page)?;

    let envelope = PageEnvelope::new(page, &fixed.route);
    Ok(Json(envelope).into_response())
}
