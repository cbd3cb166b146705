//! HRM API - REST Layer for the HRM Records Backend
//!
//! Axum handlers over a deadpool-postgres pool. Every record type goes
//! through the generic [`component::Component`] plumbing; reports are
//! hand-written aggregate queries in [`db`].

pub mod auth;
pub mod component;
pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod macros;
pub mod middleware;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use auth::{
    authenticate, authenticate_api_key, authenticate_jwt, generate_jwt_token, validate_api_key,
    validate_jwt_token, AuthConfig, AuthContext, AuthMethod, Claims,
};
pub use config::{ApiConfig, ServerConfig};
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use middleware::{auth_middleware, AuthExtractor, AuthMiddlewareState};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::{create_api_router, HrmApp, SecureRouterBuilder};
pub use state::AppState;
pub use types::*;
