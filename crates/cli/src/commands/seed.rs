//! Catalog seeding.

use super::{CliError, admin_token, backend_url, expect_success, with_token};

/// Load a JSON array of product drafts and create each one.
///
/// Products are posted one at a time so a single bad draft fails loudly
/// without aborting the rest silently.
///
/// # Errors
///
/// Returns an error on the first unreadable file, invalid JSON, or
/// rejected product.
pub async fn products(path: &str) -> Result<(), CliError> {
    let base = backend_url()?;
    let token = admin_token()?;

    let raw = std::fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.to_string(),
        source,
    })?;
    let drafts: Vec<serde_json::Value> =
        serde_json::from_str(&raw).map_err(|source| CliError::Json {
            path: path.to_string(),
            source,
        })?;

    let client = reqwest::Client::new();
    let url = format!("{base}/api/products");

    let total = drafts.len();
    for (i, draft) in drafts.into_iter().enumerate() {
        let title = draft
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or("(untitled)")
            .to_string();

        let request = with_token(client.post(&url), &token).json(&draft);
        expect_success(request.send().await?).await?;

        tracing::info!("[{}/{total}] created {title}", i + 1);
    }

    tracing::info!("seeded {total} products");
    Ok(())
}
