//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use crate::auth::AuthConfig;
use crate::config::ApiConfig;
use crate::db::DbClient;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub db: DbClient,
    pub api_config: Arc<ApiConfig>,
    pub auth_config: Arc<AuthConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(db: DbClient, api_config: ApiConfig, auth_config: AuthConfig) -> Self {
        Self {
            db,
            api_config: Arc::new(api_config),
            auth_config: Arc::new(auth_config),
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(DbClient, db);
crate::impl_from_ref!(Arc<ApiConfig>, api_config);
crate::impl_from_ref!(Arc<AuthConfig>, auth_config);
crate::impl_from_ref!(Instant, start_time);
