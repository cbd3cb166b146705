//! REST client for the HRM API.
//!
//! Records are kept as `serde_json::Value` so every collection can share
//! one table view; the analytics page uses the typed report payloads.

use crate::config::{AuthConfig, TuiConfig};
use hrm_core::{AnalyticsSummary, EntityKind};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{code} ({status}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
}

/// Error envelope returned by the API.
#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// One page of a collection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    pub items: Vec<serde_json::Value>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

/// Query string for collection requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .default_headers(build_auth_headers(&config.auth)?)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/api/v1/{}", self.base_url, kind.collection())
    }

    pub fn record_url(&self, kind: EntityKind, id: Uuid) -> String {
        format!("{}/{}", self.collection_url(kind), id)
    }

    pub async fn list(&self, kind: EntityKind, query: &ListQuery) -> Result<Page, ApiClientError> {
        let response = self
            .client
            .get(self.collection_url(kind))
            .query(query)
            .send()
            .await?;
        decode(response).await
    }

    /// Create a record; returns it as stored.
    pub async fn create(
        &self,
        kind: EntityKind,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiClientError> {
        let response = self
            .client
            .post(self.collection_url(kind))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<(), ApiClientError> {
        let response = self.client.delete(self.record_url(kind, id)).send().await?;
        check(response).await.map(|_| ())
    }

    /// Partial update; returns the stored record.
    pub async fn patch(
        &self,
        kind: EntityKind,
        id: Uuid,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiClientError> {
        let response = self
            .client
            .patch(self.record_url(kind, id))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn analytics_summary(&self) -> Result<AnalyticsSummary, ApiClientError> {
        let url = format!("{}/api/v1/analytics/summary", self.base_url);
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

async fn check(response: Response) -> Result<Response, ApiClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(api_error(status, &text))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiClientError> {
    let response = check(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Build an error from a non-success response, using the API's error
/// envelope when the body has one.
pub fn api_error(status: StatusCode, body: &str) -> ApiClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => ApiClientError::Api {
            status: status.as_u16(),
            code: err.code,
            message: err.message,
        },
        Err(_) => ApiClientError::Api {
            status: status.as_u16(),
            code: status.canonical_reason().unwrap_or("HTTP_ERROR").to_string(),
            message: body.chars().take(200).collect(),
        },
    }
}

fn build_auth_headers(auth: &AuthConfig) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(key) = auth.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        let value = HeaderValue::from_str(key.trim())
            .map_err(|e| ApiClientError::Config(format!("invalid api_key: {}", e)))?;
        headers.insert(HeaderName::from_static("x-api-key"), value);
    }
    if let Some(token) = auth.jwt.as_deref().filter(|t| !t.trim().is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| ApiClientError::Config(format!("invalid jwt: {}", e)))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_uses_envelope() {
        let body = r#"{"code":"DELETE_PROTECTED","message":"Department is still referenced"}"#;
        match api_error(StatusCode::CONFLICT, body) {
            ApiClientError::Api { status, code, message } => {
                assert_eq!(status, 409);
                assert_eq!(code, "DELETE_PROTECTED");
                assert_eq!(message, "Department is still referenced");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_api_error_without_envelope() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "Bad Gateway (502): upstream down");
    }

    #[test]
    fn test_auth_headers() -> Result<(), ApiClientError> {
        let headers = build_auth_headers(&AuthConfig {
            api_key: Some("key".to_string()),
            jwt: Some("token".to_string()),
        })?;
        assert_eq!(headers.get("x-api-key").and_then(|v| v.to_str().ok()), Some("key"));
        assert!(headers.contains_key(AUTHORIZATION));
        Ok(())
    }
}
