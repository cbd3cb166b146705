//! REST API Routes Module
//!
//! - Record CRUD under `/api/v1/<collection>` (auth required)
//! - Reports under `/api/v1/employees`, `/api/v1/analytics` and
//!   `/api/v1/departments/recompute-headcount` (auth required)
//! - `/charts`, `/health*`, `/metrics` and the OpenAPI document (public)

pub mod charts;
pub mod entities;
pub mod generic;
pub mod health;
pub mod reports;

use std::time::Duration;

use axum::{
    http::{header, header::HeaderName, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower::Layer;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{
    auth_middleware, rate_limit_middleware, AuthMiddlewareState, RateLimitState, API_KEY_HEADER,
};
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

pub use health::create_router as health_router;

/// Router wrapped so that `/path/` and `/path` resolve to the same route.
pub type HrmApp = NormalizePath<Router>;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

#[cfg(feature = "openapi")]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// PRODUCTION VALIDATION
// ============================================================================

/// Refuse to start a production deployment with open CORS or the default
/// JWT secret.
fn validate_for_production(state: &AppState) -> ApiResult<()> {
    let environment = &state.api_config.environment;
    state.auth_config.validate_for_production(environment)?;

    if state.api_config.is_production() {
        if state.api_config.cors_origins.is_empty() {
            return Err(ApiError::invalid_input(
                "CORS origins not configured for production. Set HRM_CORS_ORIGINS.",
            ));
        }
        if !state.api_config.rate_limit_enabled {
            tracing::warn!("Rate limiting is disabled in production");
        }
    }
    Ok(())
}

// ============================================================================
// SECURE ROUTER BUILDER
// ============================================================================

/// Builder for the full router with auth and rate limiting applied.
pub struct SecureRouterBuilder {
    state: AppState,
    auth_state: AuthMiddlewareState,
    rate_limit_state: RateLimitState,
}

impl SecureRouterBuilder {
    /// Validates production settings before anything is wired.
    pub fn new(state: AppState) -> ApiResult<Self> {
        validate_for_production(&state)?;

        let auth_state = AuthMiddlewareState::from_shared(state.auth_config.clone());
        let rate_limit_state = RateLimitState::new(state.api_config.clone());

        Ok(Self {
            state,
            auth_state,
            rate_limit_state,
        })
    }

    /// Record and report routes, relative to `/api/v1`.
    fn build_api_routes(&self) -> Router<AppState> {
        Router::new()
            .nest(
                "/departments",
                entities::departments::router()
                    .route("/recompute-headcount", post(reports::recompute_headcount)),
            )
            .nest("/roles", entities::roles::router())
            .nest(
                "/employees",
                entities::employees::router()
                    .route("/export.csv", get(reports::export_csv))
                    .route("/:id/summary", get(reports::employee_summary)),
            )
            .nest("/attendance", entities::attendance::router())
            .nest("/performance-reviews", entities::performance_reviews::router())
            .nest("/projects", entities::projects::router())
            .nest("/assignments", entities::assignments::router())
            .route("/analytics/summary", get(reports::analytics_summary))
            .route("/analytics/charts", get(reports::chart_series))
    }

    /// Public routes: health, charts page, metrics and API docs.
    fn build_public_routes(&self) -> Router<AppState> {
        #[allow(unused_mut)]
        let mut router = Router::new()
            .nest("/health", health::create_router())
            .route("/charts", get(charts::charts_page))
            .route("/metrics", get(metrics_handler));

        #[cfg(feature = "openapi")]
        {
            router = router.route("/openapi.json", get(openapi_json));
        }

        #[cfg(feature = "swagger-ui")]
        {
            use utoipa::OpenApi;
            use utoipa_swagger_ui::SwaggerUi;
            router = router.merge(
                SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()),
            );
        }

        router
    }

    /// Build the router.
    ///
    /// Layer order on `/api/v1` (outer to inner): per-IP rate limiting,
    /// auth, per-subject rate limiting. Failed credentials are therefore
    /// throttled like any other request from the same address. Public
    /// routes are rate limited per client IP. Observability, tracing,
    /// compression and CORS wrap everything.
    pub fn build(self) -> Router {
        let api_routes = self
            .build_api_routes()
            .layer(from_fn_with_state(
                self.rate_limit_state.clone(),
                rate_limit_middleware,
            ))
            .layer(from_fn_with_state(self.auth_state.clone(), auth_middleware))
            .layer(from_fn_with_state(
                self.rate_limit_state.clone(),
                rate_limit_middleware,
            ));

        let public_routes = self
            .build_public_routes()
            .layer(from_fn_with_state(self.rate_limit_state, rate_limit_middleware));

        let cors = build_cors_layer(&self.state.api_config);

        Router::new()
            .nest("/api/v1", api_routes)
            .merge(public_routes)
            .with_state(self.state)
            .layer(from_fn(observability_middleware))
            .layer(CompressionLayer::new())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Build the router behind trailing-slash normalization.
    pub fn build_app(self) -> HrmApp {
        NormalizePathLayer::trim_trailing_slash().layer(self.build())
    }
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// In development (no configured origins) every origin is allowed.
/// Otherwise origins are matched by [`ApiConfig::is_origin_allowed`], which
/// understands `*.example.com` entries.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static("x-ratelimit-limit"),
            header::RETRY_AFTER,
            header::CONTENT_DISPOSITION,
        ])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        return cors.allow_origin(AllowOrigin::any());
    }

    tracing::info!(origins = ?config.cors_origins, "CORS: restricted origins");
    let allowed = config.clone();
    let cors = cors.allow_origin(AllowOrigin::predicate(
        move |origin: &HeaderValue, _parts| {
            origin
                .to_str()
                .map(|o| allowed.is_origin_allowed(o))
                .unwrap_or(false)
        },
    ));
    if config.cors_allow_credentials {
        cors.allow_credentials(true)
    } else {
        cors
    }
}

/// Create the complete application: all routes, auth, rate limiting,
/// observability and trailing-slash normalization.
///
/// - `/api/v1/*` requires an API key or JWT
/// - In production, refuses insecure configuration
pub fn create_api_router(state: AppState) -> ApiResult<HrmApp> {
    Ok(SecureRouterBuilder::new(state)?.build_app())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_requires_cors_origins() {
        let pool = crate::db::DbConfig::default().create_pool();
        let Ok(pool) = pool else {
            return;
        };
        let state = AppState::new(
            crate::db::DbClient::new(pool),
            ApiConfig {
                environment: "production".to_string(),
                ..ApiConfig::default()
            },
            crate::auth::AuthConfig {
                jwt_secret: crate::auth::JwtSecret::new("x".repeat(48)),
                ..Default::default()
            },
        );
        let err = SecureRouterBuilder::new(state).err();
        assert!(err.is_some_and(|e| e.message.contains("HRM_CORS_ORIGINS")));
    }
}
