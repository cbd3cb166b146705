//! API Configuration Module
//!
//! CORS, rate limiting, paging and listen address. Everything is read from
//! `HRM_*` environment variables with development defaults.

use crate::types::PageLimits;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for CORS, rate limiting and list paging.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Rate Limiting Configuration
    // ========================================================================
    pub rate_limit_enabled: bool,

    /// Requests per minute per client IP, counted before authentication.
    pub rate_limit_unauthenticated: u32,

    /// Requests per minute per authenticated subject.
    pub rate_limit_authenticated: u32,

    /// Burst capacity (allow this many requests beyond the limit temporarily).
    pub rate_limit_burst: u32,

    /// Window size for rate limiting.
    pub rate_limit_window: Duration,

    /// Take the client IP from `X-Forwarded-For` / `X-Real-IP`. Only safe
    /// behind a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,

    // ========================================================================
    // Paging
    // ========================================================================
    pub page_limits: PageLimits,

    /// Deployment environment, e.g. `development` or `production`.
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: 86400,

            rate_limit_enabled: true,
            rate_limit_unauthenticated: 100,
            rate_limit_authenticated: 1000,
            rate_limit_burst: 10,
            rate_limit_window: Duration::from_secs(60),
            trust_proxy_headers: false,

            page_limits: PageLimits::default(),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// - `HRM_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `HRM_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `HRM_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `HRM_RATE_LIMIT_ENABLED`: "true" or "false" (default: true)
    /// - `HRM_RATE_LIMIT_UNAUTHENTICATED`: Requests per minute per IP (default: 100)
    /// - `HRM_RATE_LIMIT_AUTHENTICATED`: Requests per minute per subject (default: 1000)
    /// - `HRM_RATE_LIMIT_BURST`: Burst capacity (default: 10)
    /// - `HRM_TRUST_PROXY_HEADERS`: key IP limits on proxy headers (default: false)
    /// - `HRM_PAGE_SIZE_DEFAULT` / `HRM_PAGE_SIZE_MAX`: list paging (default: 20 / 500)
    /// - `HRM_ENVIRONMENT`: deployment environment (default: development)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_origins = std::env::var("HRM_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let rate_limit_enabled = std::env::var("HRM_RATE_LIMIT_ENABLED")
            .ok()
            .map(|s| s.trim().to_lowercase() != "false")
            .unwrap_or(defaults.rate_limit_enabled);

        let page_max: u32 =
            env_parse("HRM_PAGE_SIZE_MAX").unwrap_or(defaults.page_limits.max_size);
        let page_default: u32 = env_parse("HRM_PAGE_SIZE_DEFAULT")
            .unwrap_or(defaults.page_limits.default_size)
            .min(page_max);

        Self {
            cors_origins,
            cors_allow_credentials: env_flag("HRM_CORS_ALLOW_CREDENTIALS")
                .unwrap_or(defaults.cors_allow_credentials),
            cors_max_age_secs: env_parse("HRM_CORS_MAX_AGE_SECS")
                .unwrap_or(defaults.cors_max_age_secs),
            rate_limit_enabled,
            rate_limit_unauthenticated: env_parse("HRM_RATE_LIMIT_UNAUTHENTICATED")
                .unwrap_or(defaults.rate_limit_unauthenticated),
            rate_limit_authenticated: env_parse("HRM_RATE_LIMIT_AUTHENTICATED")
                .unwrap_or(defaults.rate_limit_authenticated),
            rate_limit_burst: env_parse("HRM_RATE_LIMIT_BURST")
                .unwrap_or(defaults.rate_limit_burst),
            rate_limit_window: defaults.rate_limit_window,
            trust_proxy_headers: env_flag("HRM_TRUST_PROXY_HEADERS")
                .unwrap_or(defaults.trust_proxy_headers),
            page_limits: PageLimits {
                default_size: page_default,
                max_size: page_max,
            },
            environment: std::env::var("HRM_ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            // Dev mode: allow all
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.example.com
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain.ends_with(&format!(".{}", pattern));
                }
            }
            false
        })
    }
}

// ============================================================================
// SERVER CONFIGURATION
// ============================================================================

/// Listen address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `HRM_API_BIND` (default 0.0.0.0) and `HRM_API_PORT`, falling back to
    /// `PORT` for platforms that inject it.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind: env_parse("HRM_API_BIND").unwrap_or(defaults.bind),
            port: env_parse("HRM_API_PORT")
                .or_else(|| env_parse("PORT"))
                .unwrap_or(defaults.port),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
