//! Router-level tests that never reach the database.
//!
//! The pool is created lazily, so these cover authentication, routing,
//! path and body rejection, validation and rate limiting without a server.

use axum::http::StatusCode;
use hrm_api::ApiConfig;
use proptest::prelude::*;
use serde_json::json;
use std::time::Duration;

#[path = "support/app.rs"]
mod test_app_support;
use test_app_support::{authed, get, send, send_raw, test_app, test_app_with};

#[tokio::test]
async fn test_health_is_public_with_and_without_trailing_slash() {
    for uri in ["/health", "/health/"] {
        let (status, body) = send(test_app(), get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body, json!({"status": "ok"}));
    }
}

#[tokio::test]
async fn test_liveness_reports_healthy() {
    let (status, body) = send(test_app(), get("/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_api_requires_credentials() {
    for uri in [
        "/api/v1/departments",
        "/api/v1/employees/export.csv",
        "/api/v1/analytics/summary",
        "/api/v1/analytics/charts/",
    ] {
        let (status, body) = send(test_app(), get(uri)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_unknown_api_key_is_rejected() {
    let request = axum::http::Request::builder()
        .uri("/api/v1/roles")
        .header("x-api-key", "not-a-key")
        .body(axum::body::Body::empty())
        .expect("request");
    let (status, _) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_authorization_is_invalid_token() {
    let request = axum::http::Request::builder()
        .uri("/api/v1/roles")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .expect("request");
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_malformed_id_is_rejected_before_lookup() {
    let (status, body) = send(test_app(), authed("GET", "/api/v1/employees/42/summary", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_FORMAT");

    let (status, _) = send(test_app(), authed("DELETE", "/api/v1/projects/not-a-uuid", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_validation_runs_before_the_store() {
    let body = json!({"name": "   ", "code": "ENG"});
    let (status, error) = send(test_app(), authed("POST", "/api/v1/departments", Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MISSING_FIELD");

    let body = json!({
        "title": "Manager",
        "level": "M1",
        "salary_band_min": "150000",
        "salary_band_max": "90000"
    });
    let (status, error) = send(test_app(), authed("POST", "/api/v1/roles", Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_RANGE");
}

#[tokio::test]
async fn test_amounts_finer_than_the_column_are_rejected() {
    let body = json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "hire_date": "2022-03-01",
        "department_id": uuid::Uuid::now_v7(),
        "role_id": uuid::Uuid::now_v7(),
        "base_salary": "50000.005"
    });
    let (status, error) = send(test_app(), authed("POST", "/api/v1/employees", Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_FAILED");
    assert_eq!(error["details"]["field"], "base_salary");

    let uri = format!("/api/v1/performance-reviews/{}", uuid::Uuid::now_v7());
    for body in [json!({"rating": "4.45"}), json!({"bonus_amount": "1000.005"})] {
        let (status, error) = send(test_app(), authed("PATCH", &uri, Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "VALIDATION_FAILED");
    }
}

#[tokio::test]
async fn test_malformed_json_body_is_validation_failure() {
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/departments")
        .header("x-api-key", test_app_support::TEST_API_KEY)
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"name\": "))
        .expect("request");
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_empty_partial_update_is_rejected() {
    let id = uuid::Uuid::now_v7();
    let uri = format!("/api/v1/employees/{}", id);
    let (status, _) = send(test_app(), authed("PATCH", &uri, Some(json!({})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[cfg(feature = "openapi")]
#[tokio::test]
async fn test_openapi_document_lists_collections() {
    let (status, content_type, body) = send_raw(test_app(), get("/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap_or_default().starts_with("application/json"));
    for path in ["/api/v1/departments", "/api/v1/performance-reviews/{id}", "/api/v1/employees/export.csv"] {
        assert!(body.contains(path), "missing {}", path);
    }
}

#[tokio::test]
async fn test_authenticated_rate_limit_returns_retry_after() {
    let config = ApiConfig {
        rate_limit_authenticated: 1,
        rate_limit_burst: 1,
        rate_limit_window: Duration::from_secs(60),
        ..ApiConfig::default()
    };
    let app = test_app_with(lazy_db(), config);

    let (first, _) = send(app.clone(), authed("GET", "/api/v1/employees/x/summary", None)).await;
    assert_eq!(first, StatusCode::BAD_REQUEST);

    let response = tower::ServiceExt::oneshot(app, authed("GET", "/api/v1/employees/x/summary", None))
        .await
        .expect("infallible");
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
}

fn tight_ip_limit(trust_proxy_headers: bool) -> ApiConfig {
    ApiConfig {
        rate_limit_unauthenticated: 2,
        rate_limit_burst: 2,
        rate_limit_window: Duration::from_secs(3600),
        trust_proxy_headers,
        ..ApiConfig::default()
    }
}

fn lazy_db() -> hrm_api::DbClient {
    hrm_api::DbClient::from_config(&hrm_api::DbConfig::default()).expect("lazy pool")
}

fn request_with(uri: &str, header: (&str, &str)) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .uri(uri)
        .header(header.0, header.1)
        .body(axum::body::Body::empty())
        .expect("request")
}

#[tokio::test]
async fn test_bad_api_keys_are_throttled_per_ip() {
    let app = test_app_with(lazy_db(), tight_ip_limit(false));
    let mut statuses = Vec::new();
    for attempt in 0..4 {
        let key = format!("guess-{}", attempt);
        let request = request_with("/api/v1/departments", ("x-api-key", &key));
        statuses.push(send(app.clone(), request).await.0);
    }
    assert_eq!(
        statuses,
        [
            StatusCode::UNAUTHORIZED,
            StatusCode::UNAUTHORIZED,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
        ]
    );
}

#[tokio::test]
async fn test_forwarded_for_is_ignored_by_default() {
    let app = test_app_with(lazy_db(), tight_ip_limit(false));
    let mut statuses = Vec::new();
    for n in 1..=4 {
        let ip = format!("198.51.100.{}", n);
        let request = request_with("/health", ("x-forwarded-for", &ip));
        statuses.push(send(app.clone(), request).await.0);
    }
    assert_eq!(statuses[..2], [StatusCode::OK, StatusCode::OK]);
    assert_eq!(statuses[2..], [StatusCode::TOO_MANY_REQUESTS, StatusCode::TOO_MANY_REQUESTS]);
}

#[tokio::test]
async fn test_forwarded_for_keys_the_limit_when_trusted() {
    let app = test_app_with(lazy_db(), tight_ip_limit(true));
    for n in 1..=4 {
        let ip = format!("198.51.100.{}", n);
        let (status, _) = send(app.clone(), request_with("/health", ("x-forwarded-for", &ip))).await;
        assert_eq!(status, StatusCode::OK, "{}", ip);
    }
    let mut last = StatusCode::OK;
    for _ in 0..3 {
        last = send(app.clone(), request_with("/health", ("x-forwarded-for", "198.51.100.1"))).await.0;
    }
    assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);
}

#[cfg(feature = "db-tests")]
#[tokio::test]
async fn test_charts_page_renders_in_full() {
    let db = hrm_api::DbClient::from_config(&hrm_api::DbConfig::from_env()).expect("db client");
    db.migrate().await.expect("migrate");
    let (status, content_type, body) =
        send_raw(test_app_with(db, ApiConfig::default()), get("/charts/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap_or_default().starts_with("text/html"));
    assert!(body.contains(r#"<script type="application/json" id="chart-data">{"dept_labels":"#));
    assert!(body.contains(r##""#4a7bd0""##));
    assert!(body.contains(r##""#222""##));
    assert!(body.contains(r#"bars("rating-chart""#));
    assert!(body.trim_end().ends_with("</html>"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_non_uuid_segments_are_invalid_format(segment in "[a-z0-9-]{1,30}") {
        prop_assume!(uuid::Uuid::parse_str(&segment).is_err());
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| TestCaseError::fail(format!("runtime: {}", e)))?;
        let uri = format!("/api/v1/attendance/{}", segment);
        let (status, body) = runtime.block_on(send(test_app(), authed("GET", &uri, None)));
        prop_assert_eq!(status, StatusCode::BAD_REQUEST);
        prop_assert_eq!(&body["code"], "INVALID_FORMAT");
    }
}
