//! Shared-secret authentication gate
//!
//! Every data route requires `Authorization: Bearer <API_KEY>`. The check runs
//! before any handler, so a rejected request never touches a workbook.

use crate::config::ApiKey;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

const BEARER_PREFIX: &[u8] = b"Bearer ";

/// Check an `Authorization` header value against the configured key
///
/// # Returns
/// * `Ok(())` - Header is exactly `Bearer <key>`
/// * `Err(AppError::Unauthorized)` - Header missing or wrong
pub fn verify_bearer(key: &ApiKey, header: Option<&HeaderValue>) -> Result<(), AppError> {
    let presented = header.map(HeaderValue::as_bytes).unwrap_or_default();

    let authorized = presented.len() == BEARER_PREFIX.len() + key.expose().len()
        && presented.starts_with(BEARER_PREFIX)
        && constant_time_eq(&presented[BEARER_PREFIX.len()..], key.expose().as_bytes());

    if authorized {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Middleware rejecting requests without the configured bearer token
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(err) = verify_bearer(&state.api_key, request.headers().get(AUTHORIZATION)) {
        tracing::warn!(path = %request.uri().path(), "Rejected unauthenticated request");
        return Err(err);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ApiKey {
        ApiKey::new("s3cret")
    }

    #[test]
    fn test_valid_bearer() {
        let header = HeaderValue::from_static("Bearer s3cret");
        assert!(verify_bearer(&key(), Some(&header)).is_ok());
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            verify_bearer(&key(), None),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_values() {
        for value in [
            "Bearer wrong",
            "Bearer s3cret ",
            "bearer s3cret",
            "s3cret",
            "Basic s3cret",
            "Bearer s3cre",
            "Bearer ",
        ] {
            let header = HeaderValue::from_str(value).unwrap();
            assert!(
                verify_bearer(&key(), Some(&header)).is_err(),
                "{:?} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
