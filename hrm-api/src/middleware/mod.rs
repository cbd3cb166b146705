//! Middleware for the HRM API.
//!
//! - `auth`: API key / JWT authentication
//! - `rate_limit`: per-subject and per-IP request quotas
//!
//! Layer order on `/api/v1` (outermost first): auth, then rate limiting,
//! so quotas can key on the authenticated subject.

mod auth;
mod rate_limit;

pub use auth::{
    auth_middleware, extract_auth_context, AuthExtractor, AuthMiddlewareError,
    AuthMiddlewareState, API_KEY_HEADER,
};
pub use rate_limit::{rate_limit_middleware, RateLimitError, RateLimitKey, RateLimitState};
