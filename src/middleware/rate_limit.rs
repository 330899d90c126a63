//! Per-client request rate limiting
//!
//! Fixed window per client IP address. Requests are counted before
//! authentication, so failed attempts also consume the allowance.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Length of one rate-limit window
pub const WINDOW: Duration = Duration::from_secs(60 * 60);

/// Tracked clients above which expired windows are dropped
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client address
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    /// Allow `limit` requests per `window` for each client
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Allow `limit` requests per hour for each client
    pub fn per_hour(limit: u32) -> Self {
        Self::new(limit, WINDOW)
    }

    /// Requests allowed per window
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Record a request from `client`; false once the allowance is spent
    pub fn check(&self, client: IpAddr) -> bool {
        self.check_at(client, Instant::now())
    }

    /// [`check`](Self::check) against an explicit clock reading
    pub fn check_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());

        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.saturating_duration_since(w.started) < window);
        }

        let entry = clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.limit {
            return false;
        }
        entry.count += 1;
        true
    }
}

/// Client address from the connection, or a shared bucket when unknown
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Middleware rejecting clients that exceeded their allowance
pub async fn enforce_rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(limiter) = &state.rate_limiter {
        let client = client_ip(&request);
        if !limiter.check(client) {
            tracing::warn!(client = %client, limit = limiter.limit(), "Rate limit exceeded");
            return Err(AppError::RateLimited);
        }
    }
    Ok(next.run(request).await)
}
