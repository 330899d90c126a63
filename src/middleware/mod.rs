//! HTTP middleware
//!
//! Request tracing, the shared-secret gate and the per-client rate limiter.

pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::require_bearer;
pub use rate_limit::{enforce_rate_limit, RateLimiter};
pub use request_id::request_id_middleware;
