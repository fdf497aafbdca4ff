//! AIMS backend REST client, admin scope.
//!
//! Same transport conventions as the storefront client, different surface:
//! management endpoints (product CRUD, users, order status, operation
//! history) instead of the public catalog. There is no cache here -
//! management screens must never show stale stock or pricing.
//!
//! Every call carries the admin's bearer token; the backend is the sole
//! authorization authority.

pub mod orders;
pub mod products;
pub mod users;

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when talking to the AIMS backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 400: validation or business-rule failure, message from the backend.
    #[error("{0}")]
    Validation(String),

    /// 401/403: the bearer token is missing, expired or insufficient.
    #[error("unauthorized")]
    Unauthorized,

    /// 404: resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// 409: a conflicting operation is in progress. Surfaced to the user;
    /// never retried automatically.
    #[error("conflicting operation in progress: {0}")]
    Conflict(String),

    /// Any other non-success status.
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error body shape the backend uses for 4xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Paginated list response, as the management endpoints shape it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Client for the AIMS backend management API.
#[derive(Clone)]
pub struct AdminBackendClient {
    inner: Arc<AdminBackendClientInner>,
}

struct AdminBackendClientInner {
    client: reqwest::Client,
    /// Backend root, e.g. `http://localhost:8080`.
    base_url: String,
}

impl AdminBackendClient {
    /// Create a new admin backend client.
    #[must_use]
    pub fn new(backend_url: &str) -> Self {
        Self {
            inner: Arc::new(AdminBackendClientInner {
                client: reqwest::Client::new(),
                base_url: backend_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Probe the backend's health endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), BackendError> {
        let url = format!("{}/actuator/health", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::Api {
                status: status.as_u16(),
                message: "backend unhealthy".to_string(),
            })
        }
    }

    /// Build a full URL for an `/api` path.
    fn api_url(&self, path: &str) -> String {
        format!("{}/api{path}", self.inner.base_url)
    }

    /// GET an `/api` path and decode the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let response = self
            .inner
            .client
            .get(self.api_url(path))
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// POST JSON to an `/api` path and decode the JSON response.
    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .inner
            .client
            .post(self.api_url(path))
            .json(body)
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// PUT JSON to an `/api` path and decode the JSON response.
    async fn put_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .inner
            .client
            .put(self.api_url(path))
            .json(body)
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// PATCH JSON to an `/api` path and decode the JSON response.
    async fn patch_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .inner
            .client
            .patch(self.api_url(path))
            .json(body)
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// POST JSON to an `/api` path, discarding any response body.
    async fn post_unit<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.api_url(path))
            .json(body)
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    /// DELETE an `/api` path, discarding any response body.
    async fn delete_unit(&self, path: &str, token: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .delete(self.api_url(path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    /// Map the response status, then parse the body.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        let text = response.text().await?;

        if let Some(err) = classify_error(status, &text) {
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    /// Map the response status, ignoring the body on success.
    async fn expect_success(response: reqwest::Response) -> Result<(), BackendError> {
        let status = response.status();
        let text = response.text().await?;

        match classify_error(status, &text) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Turn a non-success status plus body into the matching `BackendError`.
fn classify_error(status: reqwest::StatusCode, body: &str) -> Option<BackendError> {
    use reqwest::StatusCode;

    if status.is_success() {
        return None;
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(200).collect());

    Some(match status {
        StatusCode::BAD_REQUEST => BackendError::Validation(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized,
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        StatusCode::CONFLICT => BackendError::Conflict(message),
        _ => BackendError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_conflict_is_not_retried_shape() {
        // 409 surfaces as Conflict; callers show it and wait for the user
        let err = classify_error(StatusCode::CONFLICT, r#"{"message":"locked"}"#).unwrap();
        assert!(matches!(err, BackendError::Conflict(m) if m == "locked"));
    }

    #[test]
    fn test_paginated_decodes_with_and_without_meta() {
        let full: Paginated<i32> = serde_json::from_value(serde_json::json!({
            "data": [1, 2], "total": 2, "page": 1, "limit": 10, "totalPages": 1
        }))
        .unwrap();
        assert_eq!(full.data, vec![1, 2]);
        assert_eq!(full.total_pages, Some(1));

        let bare: Paginated<i32> = serde_json::from_value(serde_json::json!({
            "data": [], "total": 0
        }))
        .unwrap();
        assert!(bare.data.is_empty());
        assert_eq!(bare.page, None);
    }
}
