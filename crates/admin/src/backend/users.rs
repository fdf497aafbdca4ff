//! User management operations.

use serde::Serialize;
use tracing::instrument;

use aims_core::{Role, User, UserId};

use super::{AdminBackendClient, BackendError, Paginated};

/// User list query.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub role: Option<Role>,
}

impl UserQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(role) = self.role {
            let label = match role {
                Role::Admin => "ADMIN",
                Role::ProductManager => "PRODUCT_MANAGER",
                Role::Customer => "CUSTOMER",
            };
            pairs.push(("role", label.to_string()));
        }
        pairs
    }
}

/// Create/update payload for a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    /// Required on create, ignored on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AdminBackendClient {
    /// List/search users.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn users(
        &self,
        query: &UserQuery,
        token: &str,
    ) -> Result<Paginated<User>, BackendError> {
        self.get_json("/users", token, &query.query_pairs()).await
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// draft (duplicate email, weak password).
    #[instrument(skip(self, draft, token))]
    pub async fn create_user(&self, draft: &UserDraft, token: &str) -> Result<User, BackendError> {
        self.post_json("/users", token, draft).await
    }

    /// Update a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the user is missing.
    #[instrument(skip(self, draft, token), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: UserId,
        draft: &UserDraft,
        token: &str,
    ) -> Result<User, BackendError> {
        self.put_json(&format!("/users/{id}"), token, draft).await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId, token: &str) -> Result<(), BackendError> {
        self.delete_unit(&format!("/users/{id}"), token).await
    }

    /// Trigger a password reset for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn reset_password(&self, id: UserId, token: &str) -> Result<(), BackendError> {
        self.post_unit(
            &format!("/users/{id}/reset-password"),
            token,
            &serde_json::json!({}),
        )
        .await
    }

    /// Admin login (same endpoint as the storefront).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] on bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, BackendError> {
        #[derive(Serialize)]
        struct Request<'a> {
            email: &'a str,
            password: &'a str,
        }

        // Login is the one unauthenticated call
        let response = self
            .inner
            .client
            .post(self.api_url("/auth/login"))
            .json(&Request { email, password })
            .send()
            .await?;
        Self::decode(response).await
    }
}

/// Successful login: the bearer token and the authenticated user.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_query_role_filter() {
        let query = UserQuery {
            role: Some(Role::ProductManager),
            ..UserQuery::default()
        };
        assert!(
            query
                .query_pairs()
                .contains(&("role", "PRODUCT_MANAGER".to_owned()))
        );
    }

    #[test]
    fn test_user_draft_omits_password_on_update() {
        let draft = UserDraft {
            name: "A".to_owned(),
            email: "a@example.com".to_owned(),
            phone: None,
            role: Role::Customer,
            password: None,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("password").is_none());
    }
}
