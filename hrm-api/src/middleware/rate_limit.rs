//! Rate limiting middleware.
//!
//! The same middleware is layered twice on `/api/v1`: outside auth it
//! counts every request against the client IP, inside auth it counts
//! against the authenticated subject. Exceeding a quota yields 429 with a
//! `Retry-After` header. Keys idle for a full window are evicted.

use crate::auth::AuthContext;
use crate::config::ApiConfig;
use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{clock::Clock, clock::DefaultClock, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

type DirectRateLimiter =
    RateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, DefaultClock>;

/// Key for rate limiting.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum RateLimitKey {
    /// Unauthenticated request, keyed by IP address
    Ip(IpAddr),
    /// Authenticated request, keyed by user id
    Subject(String),
}

struct TrackedLimiter {
    limiter: Arc<DirectRateLimiter>,
    last_seen: Instant,
}

/// State for rate limiting middleware.
#[derive(Clone)]
pub struct RateLimitState {
    config: Arc<ApiConfig>,
    limiters: Arc<DashMap<RateLimitKey, TrackedLimiter>>,
    clock: DefaultClock,
    started: Instant,
    /// Milliseconds after `started` of the last eviction sweep.
    last_sweep_ms: Arc<AtomicU64>,
}

impl RateLimitState {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self {
            config,
            limiters: Arc::new(DashMap::new()),
            clock: DefaultClock::default(),
            started: Instant::now(),
            last_sweep_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    fn limit_for(&self, key: &RateLimitKey) -> u32 {
        match key {
            RateLimitKey::Ip(_) => self.config.rate_limit_unauthenticated,
            RateLimitKey::Subject(_) => self.config.rate_limit_authenticated,
        }
    }

    /// `limit` requests per window, replenished evenly, with a burst
    /// allowance of `rate_limit_burst`.
    fn quota(&self, limit: u32) -> Quota {
        let limit = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.config.rate_limit_burst).unwrap_or(NonZeroU32::MIN);
        let window = self.config.rate_limit_window.max(Duration::from_millis(1));
        let period = window / limit.get();
        Quota::with_period(period.max(Duration::from_nanos(1)))
            .unwrap_or_else(|| Quota::per_minute(limit))
            .allow_burst(burst)
    }

    fn limiter(&self, key: &RateLimitKey, now: Instant) -> Arc<DirectRateLimiter> {
        let mut entry = self.limiters.entry(key.clone()).or_insert_with(|| TrackedLimiter {
            limiter: Arc::new(RateLimiter::direct(self.quota(self.limit_for(key)))),
            last_seen: now,
        });
        entry.last_seen = now;
        entry.limiter.clone()
    }

    /// Idle time after which a key's limiter is back to a full burst and
    /// can be dropped.
    fn idle_after(&self) -> Duration {
        self.config.rate_limit_window.max(Duration::from_secs(1))
    }

    /// Drop limiters not used since `now - window`. Returns how many were
    /// removed.
    pub fn evict_idle(&self, now: Instant) -> usize {
        let idle = self.idle_after();
        let before = self.limiters.len();
        self.limiters
            .retain(|_, tracked| now.saturating_duration_since(tracked.last_seen) < idle);
        before.saturating_sub(self.limiters.len())
    }

    /// Sweep at most once per window, from whichever request gets there
    /// first.
    fn maybe_evict(&self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.started).as_millis() as u64;
        let last = self.last_sweep_ms.load(Ordering::Relaxed);
        let idle_ms = self.idle_after().as_millis() as u64;
        if elapsed.saturating_sub(last) < idle_ms {
            return;
        }
        if self
            .last_sweep_ms
            .compare_exchange(last, elapsed, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            let removed = self.evict_idle(now);
            if removed > 0 {
                tracing::debug!(removed, "Evicted idle rate limit keys");
            }
        }
    }

    /// Consume one request for `key`. On refusal returns the wait in
    /// whole seconds, at least one.
    pub fn check(&self, key: &RateLimitKey) -> Result<(), u64> {
        let now = Instant::now();
        self.maybe_evict(now);
        self.limiter(key, now).check().map_err(|not_until| {
            not_until
                .wait_time_from(self.clock.now())
                .as_secs()
                .max(1)
        })
    }

    pub fn tracked_keys(&self) -> usize {
        self.limiters.len()
    }
}

/// Rejection for a request over quota.
#[derive(Debug)]
pub struct RateLimitError {
    /// Seconds until the next request is allowed
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut response = ApiError::too_many_requests(Some(self.retry_after)).into_response();
        if let Ok(value) = HeaderValue::from_str(&self.retry_after.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}

/// Client IP from the connection, or from proxy headers when
/// `trust_proxy_headers` is set. Falls back to loopback.
fn client_ip(request: &Request, trust_proxy_headers: bool) -> IpAddr {
    let header_ip = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    };
    let connection_ip = || {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    };

    let forwarded = if trust_proxy_headers {
        header_ip("x-forwarded-for").or_else(|| header_ip("x-real-ip"))
    } else {
        None
    };
    forwarded
        .or_else(connection_ip)
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    if !state.config.rate_limit_enabled {
        return Ok(next.run(request).await);
    }

    let key = match request.extensions().get::<AuthContext>() {
        Some(auth) => RateLimitKey::Subject(auth.user_id.clone()),
        None => RateLimitKey::Ip(client_ip(&request, state.config.trust_proxy_headers)),
    };

    if let Err(retry_after) = state.check(&key) {
        tracing::warn!(key = ?key, retry_after, "Rate limit exceeded");
        return Err(RateLimitError { retry_after });
    }

    let limit = state.limit_for(&key);
    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&limit.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-ratelimit-limit"), value);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn tight_config() -> Arc<ApiConfig> {
        Arc::new(ApiConfig {
            rate_limit_unauthenticated: 2,
            rate_limit_burst: 2,
            rate_limit_window: Duration::from_secs(3600),
            ..ApiConfig::default()
        })
    }

    #[test]
    fn test_burst_then_refusal() {
        let state = RateLimitState::new(tight_config());
        let key = RateLimitKey::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        assert!(state.check(&key).is_ok());
        assert!(state.check(&key).is_ok());
        let retry = state.check(&key);
        assert!(matches!(retry, Err(secs) if secs >= 1));

        let other = RateLimitKey::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)));
        assert!(state.check(&other).is_ok());
        assert_eq!(state.tracked_keys(), 2);
    }

    #[test]
    fn test_idle_keys_are_evicted_after_a_window() {
        let state = RateLimitState::new(tight_config());
        for last in 1..=5u8 {
            let key = RateLimitKey::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, last)));
            assert!(state.check(&key).is_ok());
        }
        assert_eq!(state.tracked_keys(), 5);

        assert_eq!(state.evict_idle(Instant::now()), 0);
        let later = Instant::now() + Duration::from_secs(3601);
        assert_eq!(state.evict_idle(later), 5);
        assert_eq!(state.tracked_keys(), 0);
    }

    fn forwarded(ip: &str) -> Request {
        let mut request = Request::new(Body::empty());
        if let Ok(value) = HeaderValue::from_str(ip) {
            request.headers_mut().insert("x-forwarded-for", value);
        }
        request
    }

    #[test]
    fn test_proxy_headers_only_when_trusted() {
        let request = forwarded("203.0.113.9, 10.0.0.1");
        assert_eq!(client_ip(&request, false), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(
            client_ip(&request, true),
            IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9))
        );
    }

    #[tokio::test]
    async fn test_middleware_returns_429_with_retry_after() -> Result<(), String> {
        let state = RateLimitState::new(tight_config());
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(state, rate_limit_middleware));

        let mut last = StatusCode::OK;
        let mut retry_after = None;
        for _ in 0..3 {
            let request = axum::http::Request::builder()
                .uri("/")
                .header("x-forwarded-for", "192.0.2.7")
                .body(Body::empty())
                .map_err(|e| e.to_string())?;
            let response = app
                .clone()
                .oneshot(request)
                .await
                .map_err(|e| format!("{:?}", e))?;
            last = response.status();
            retry_after = response.headers().get(header::RETRY_AFTER).cloned();
        }

        assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);
        assert!(retry_after.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_disabled_limiter_passes_everything() -> Result<(), String> {
        let config = Arc::new(ApiConfig {
            rate_limit_enabled: false,
            ..(*tight_config()).clone()
        });
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                RateLimitState::new(config),
                rate_limit_middleware,
            ));
        for _ in 0..5 {
            let request = axum::http::Request::builder()
                .uri("/")
                .body(Body::empty())
                .map_err(|e| e.to_string())?;
            let response = app
                .clone()
                .oneshot(request)
                .await
                .map_err(|e| format!("{:?}", e))?;
            assert_eq!(response.status(), StatusCode::OK);
        }
        Ok(())
    }
}
