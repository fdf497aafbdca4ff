//! User creation.

use serde_json::json;

use super::{CliError, admin_token, backend_url, expect_success, with_token};

/// Create a user with one role.
///
/// # Errors
///
/// Returns an error if the request fails or the backend rejects the user
/// (duplicate email, unknown role).
pub async fn create(email: &str, name: &str, role: &str, password: &str) -> Result<(), CliError> {
    let base = backend_url()?;
    let token = admin_token()?;

    let body = json!({
        "name": name,
        "email": email,
        "role": role.to_uppercase(),
        "password": password,
    });

    let client = reqwest::Client::new();
    let request = with_token(client.post(format!("{base}/api/users")), &token).json(&body);
    expect_success(request.send().await?).await?;

    tracing::info!("created user {email} with role {role}");
    Ok(())
}
