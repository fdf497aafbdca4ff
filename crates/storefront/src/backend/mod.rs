//! AIMS backend REST client.
//!
//! # Architecture
//!
//! - One `reqwest` client per binary; the backend is the source of truth
//!   for pricing, inventory, rush eligibility and authorization
//! - Bearer tokens are per-request (taken from the caller's session), never
//!   stored in the client
//! - Catalog reads are cached in-memory via `moka` (5 minute TTL); anything
//!   mutable goes straight through
//! - The confirmation-email call has its own client with a 5 second
//!   timeout; no other request carries a timeout and nothing is retried
//!
//! # Example
//!
//! ```rust,ignore
//! use aims_storefront::backend::BackendClient;
//!
//! let backend = BackendClient::new(&config.backend)?;
//! let page = backend.random_products(1, 20).await?;
//! let product = backend.product(page.data[0].id).await?;
//! ```

pub mod auth;
pub mod cart;
pub mod email;
pub mod orders;
pub mod payment;
pub mod products;
pub mod rush;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::BackendConfig;

use products::CatalogCacheValue;

/// How long the confirmation-email request may run before being abandoned.
const EMAIL_TIMEOUT: Duration = Duration::from_secs(5);

/// Catalog cache TTL.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Errors that can occur when talking to the AIMS backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failed (connection refused, timeout, etc).
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

/// Client for the AIMS backend REST API.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    /// Dedicated client for the best-effort confirmation email (5s timeout).
    email_client: reqwest::Client,
    /// Backend root, e.g. `http://localhost:8080`.
    base_url: String,
    /// Gateway identifier forwarded on the payment redirect.
    payment_gateway: String,
    catalog_cache: Cache<String, CatalogCacheValue>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let catalog_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                email_client: reqwest::Client::builder()
                    .timeout(EMAIL_TIMEOUT)
                    .build()?,
                base_url: config.base_url.clone(),
                payment_gateway: config.payment_gateway.clone(),
                catalog_cache,
            }),
        })
    }

    /// Backend root URL (no `/api` suffix).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Gateway identifier for the payment redirect.
    #[must_use]
    pub fn payment_gateway(&self) -> &str {
        &self.inner.payment_gateway
    }

    fn catalog_cache(&self) -> &Cache<String, CatalogCacheValue> {
        &self.inner.catalog_cache
    }

    fn email_client(&self) -> &reqwest::Client {
        &self.inner.email_client
    }

    fn raw_client(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Build a full URL for an `/api` path.
    fn api_url(&self, path: &str) -> String {
        format!("{}/api{path}", self.inner.base_url)
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

    /// GET an `/api` path and decode the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let mut request = self.inner.client.get(self.api_url(path)).query(query);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::decode(request.send().await?).await
    }

    /// POST JSON to an `/api` path and decode the JSON response.
    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, BackendError> {
        let mut request = self.inner.client.post(self.api_url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::decode(request.send().await?).await
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
