//! Backend health probe.

use super::{CliError, backend_url, expect_success};

/// Ping the backend's health endpoint.
///
/// # Errors
///
/// Returns an error if the backend is unreachable or unhealthy.
pub async fn check() -> Result<(), CliError> {
    let base = backend_url()?;
    let url = format!("{base}/actuator/health");

    let response = reqwest::get(&url).await?;
    expect_success(response).await?;

    tracing::info!("backend at {base} is healthy");
    Ok(())
}
