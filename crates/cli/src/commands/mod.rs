//! CLI command implementations.

pub mod health;
pub mod seed;
pub mod users;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("failed to read {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Backend base URL from the environment.
pub fn backend_url() -> Result<String, CliError> {
    let _ = dotenvy::dotenv();
    std::env::var("AIMS_BACKEND_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .map_err(|_| CliError::MissingEnv("AIMS_BACKEND_URL"))
}

/// Bearer token for mutating commands.
pub fn admin_token() -> Result<SecretString, CliError> {
    std::env::var("AIMS_ADMIN_TOKEN")
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnv("AIMS_ADMIN_TOKEN"))
}

/// Fail on a non-success response, reading the body into the error.
pub async fn expect_success(response: reqwest::Response) -> Result<(), CliError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let message = response.text().await.unwrap_or_default();
    Err(CliError::Api {
        status: status.as_u16(),
        message: message.chars().take(300).collect(),
    })
}

/// Attach the admin bearer token to a request.
pub fn with_token(
    request: reqwest::RequestBuilder,
    token: &SecretString,
) -> reqwest::RequestBuilder {
    request.bearer_auth(token.expose_secret())
}
