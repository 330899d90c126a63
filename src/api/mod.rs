//! API module
//!
//! Contains HTTP request handlers and the router tying them to their paths
//! and middleware.

pub mod files;
pub mod health;
pub mod sheets;

use crate::middleware::{enforce_rate_limit, request_id_middleware, require_bearer};
use crate::state::AppState;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router
///
/// Data routes sit behind the rate limiter and then the bearer gate; the
/// liveness probes are open.
pub fn router(state: Arc<AppState>) -> Router {
    let data_routes = Router::new()
        .route("/files", get(files::list_files))
        .route("/file/:file/sheets", get(files::list_sheets))
        .route("/file/:file/sheet/:sheet", get(sheets::file_sheet_page))
        .route(&state.fixed.route, get(sheets::fixed_source_page))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_rate_limit,
        ));

    Router::new()
        .route("/", get(health::liveness))
        .route("/health", get(health::health_check))
        .merge(data_routes)
        // Middleware (order matters - request_id should be first)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
