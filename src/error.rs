//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! Every error renders as a JSON body with a single `error` field.

use crate::services::pagination::PaginationError;
use crate::services::workbook::SourceError;
use axum::{
    extract::{path::ErrorKind, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur while serving a request are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or incorrect bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Client supplied a malformed argument (e.g. a non-positive page)
    #[error("{0}")]
    InvalidArgument(String),

    /// Source file or a resource inside it does not exist
    #[error("{0}")]
    NotFound(String),

    /// Source exists but could not be decoded
    #[error("{0}")]
    Decode(String),

    /// Client exceeded its request allowance
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message used when the page query parameter is rejected
    pub fn invalid_page() -> Self {
        AppError::InvalidArgument("Invalid page value".to_string())
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(msg) => AppError::NotFound(msg),
            SourceError::Decode(msg) => AppError::Decode(msg),
            SourceError::Io(e) => {
                AppError::Internal(anyhow::Error::new(e).context("Failed to read data directory"))
            }
        }
    }
}

impl From<PaginationError> for AppError {
    fn from(err: PaginationError) -> Self {
        match err {
            PaginationError::InvalidPage(_) => AppError::invalid_page(),
            PaginationError::InvalidPageSize => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

/// Path segments that fail to extract (e.g. invalid UTF-8) cannot name any
/// workbook or sheet, so they are reported as not found
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected path parameters");
        let message = match &rejection {
            PathRejection::FailedToDeserializePathParams(e) => match e.kind() {
                ErrorKind::InvalidUtf8InPathParam { key } if key == "sheet" => "Sheet not found",
                _ => "File not found",
            },
            _ => "File not found",
        };
        AppError::NotFound(message.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
