//! Authentication against the AIMS backend.
//!
//! The storefront never stores credentials; it exchanges them for a bearer
//! token and keeps the token (plus the user snapshot) in the session.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use aims_core::User;

use super::{BackendClient, BackendError};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Successful login: the bearer token and the authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl BackendClient {
    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] on bad credentials, or any
    /// transport/decoding failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, BackendError> {
        self.post_json("/auth/login", None, &LoginRequest { email, password })
            .await
    }
}
