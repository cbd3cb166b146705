use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use hrm_api::{create_api_router, ApiConfig, AppState, AuthConfig, DbClient, DbConfig, HrmApp};
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key-0123456789";

/// Router over a lazily connecting pool. Requests that never reach the
/// database work without a running server.
pub fn test_app_with(db: DbClient, api_config: ApiConfig) -> HrmApp {
    let mut auth_config = AuthConfig::default();
    auth_config.add_api_key(TEST_API_KEY.to_string());
    let state = AppState::new(db, api_config, auth_config);
    create_api_router(state).expect("Failed to build router")
}

pub fn test_app() -> HrmApp {
    let db = DbClient::from_config(&DbConfig::default()).expect("Failed to create lazy pool");
    test_app_with(db, ApiConfig::default())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn authed(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-api-key", TEST_API_KEY);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

/// Send one request and return the status with the body parsed as JSON
/// (`Null` for empty or non-JSON bodies).
pub async fn send(app: HrmApp, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send one request and return the status, content type and raw body.
pub async fn send_raw(app: HrmApp, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app.oneshot(request).await.expect("infallible");
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
}
