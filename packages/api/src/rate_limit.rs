//! Fixed-window request limiter for the authentication endpoints.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use parking_lot::Mutex;
use tracing::warn;

use crate::error::ApiError;
use crate::settings;
use crate::state::AppState;

/// Windows older than this many windows are dropped on the next sweep.
const SWEEP_AFTER_WINDOWS: u32 = 4;

#[derive(Debug)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    // key -> (window start, hits in window), last sweep
    windows: Mutex<(HashMap<String, (Instant, u32)>, Instant)>,
}

impl RateLimiter {
    /// `max == 0` disables limiting.
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            windows: Mutex::new((HashMap::new(), Instant::now())),
        }
    }

    pub fn from_settings(settings: &settings::RateLimit) -> Self {
        Self::new(settings.max, settings.window())
    }

    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    fn allow_at(&self, key: &str, now: Instant) -> bool {
        if self.max == 0 {
            return true;
        }

        let mut guard = self.windows.lock();
        let (windows, last_sweep) = &mut *guard;

        let stale = self.window * SWEEP_AFTER_WINDOWS;
        if now.saturating_duration_since(*last_sweep) >= stale {
            windows.retain(|_, (start, _)| now.saturating_duration_since(*start) < stale);
            *last_sweep = now;
        }

        let (start, hits) = windows.entry(key.to_owned()).or_insert((now, 0));
        if now.saturating_duration_since(*start) >= self.window {
            *start = now;
            *hits = 0;
        }
        if *hits >= self.max {
            return false;
        }
        *hits += 1;
        true
    }
}

/// Middleware: reject with 429 once the client IP exhausts its window.
pub async fn limit_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !state.auth_limiter.allow(&key) {
        warn!("rate limit exceeded for {key}");
        return Err(ApiError::TooManyRequests);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_after_limit_until_window_resets() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(limiter.allow_at("10.0.0.1", t0));
        assert!(limiter.allow_at("10.0.0.1", t0));
        assert!(!limiter.allow_at("10.0.0.1", t0 + Duration::from_secs(30)));

        // Other clients have their own window.
        assert!(limiter.allow_at("10.0.0.2", t0));

        assert!(limiter.allow_at("10.0.0.1", t0 + Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_limit_always_allows() {
        let limiter = RateLimiter::new(0, Duration::from_secs(60));
        for _ in 0..500 {
            assert!(limiter.allow("any"));
        }
    }

    #[test]
    fn test_sweep_drops_stale_clients() {
        let limiter = RateLimiter::new(5, Duration::from_secs(1));
        let t0 = Instant::now();
        limiter.allow_at("a", t0);
        limiter.allow_at("b", t0);
        assert_eq!(limiter.windows.lock().0.len(), 2);

        limiter.allow_at("c", t0 + Duration::from_secs(10));
        let guard = limiter.windows.lock();
        assert_eq!(guard.0.len(), 1);
        assert!(guard.0.contains_key("c"));
    }
}
