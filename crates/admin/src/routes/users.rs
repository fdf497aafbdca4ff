//! User management handlers.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use aims_core::{Email, Role, User, UserId};

use crate::backend::BackendError;
use crate::backend::users::{UserDraft, UserQuery};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdminAuth;
use crate::routes::products::require_token;
use crate::state::AppState;
use crate::validation::attribute_user_error;

/// Minimum password length on user creation.
const MIN_PASSWORD_LENGTH: usize = 8;

/// A page of users.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListView {
    pub users: Vec<User>,
    pub total: i64,
}

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub role: Option<Role>,
}

/// Create/update form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Option<Role>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserForm {
    /// Field-level validation. `require_password` is set on create.
    fn validate(
        &self,
        require_password: bool,
    ) -> std::result::Result<(), BTreeMap<&'static str, String>> {
        let mut errors = BTreeMap::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required".to_owned());
        }

        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required".to_owned());
        } else if Email::parse(self.email.trim()).is_err() {
            errors.insert("email", "Email is invalid".to_owned());
        }

        if let Some(phone) = &self.phone {
            let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
            if !digits.is_empty()
                && (digits.len() < 10
                    || digits.len() > 11
                    || !digits.chars().all(|c| c.is_ascii_digit()))
            {
                errors.insert("phone", "Phone number is invalid".to_owned());
            }
        }

        if self.role.is_none() {
            errors.insert("role", "Role is required".to_owned());
        }

        match &self.password {
            Some(password) if password.len() < MIN_PASSWORD_LENGTH => {
                errors.insert(
                    "password",
                    format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
                );
            }
            None if require_password => {
                errors.insert("password", "Password is required".to_owned());
            }
            _ => {}
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    fn into_draft(self) -> UserDraft {
        // validate() has established role is present
        let role = self.role.unwrap_or(Role::Customer);
        UserDraft {
            name: self.name,
            email: self.email,
            phone: self.phone,
            role,
            password: self.password,
        }
    }
}

fn field_error_response(errors: BTreeMap<&'static str, String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "Validation failed", "errors": errors })),
    )
        .into_response()
}

/// Only full admins touch user records.
fn require_user_admin(admin: &crate::models::CurrentAdmin) -> Result<()> {
    if admin.can_manage_users() {
        Ok(())
    } else {
        Err(AppError::Unauthorized(
            "User management requires an administrator role".to_owned(),
        ))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Paginated user list/search.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<UserListView>> {
    require_user_admin(&admin)?;
    let token = require_token(&session).await?;

    let page = state
        .backend()
        .users(
            &UserQuery {
                page: query.page,
                limit: query.limit,
                search: query.search,
                role: query.role,
            },
            &token,
        )
        .await?;

    Ok(Json(UserListView {
        users: page.data,
        total: page.total,
    }))
}

/// Create a user.
#[instrument(skip(admin, state, session, form))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<UserForm>,
) -> Result<Response> {
    require_user_admin(&admin)?;

    if let Err(errors) = form.validate(true) {
        return Ok(field_error_response(errors));
    }

    let token = require_token(&session).await?;
    match state.backend().create_user(&form.into_draft(), &token).await {
        Ok(user) => Ok(Json(user).into_response()),
        Err(BackendError::Validation(message)) => {
            Ok(field_error_response(attribute_user_error(&message)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Update a user.
#[instrument(skip(admin, state, session, form), fields(user_id = %id))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Json(form): Json<UserForm>,
) -> Result<Response> {
    require_user_admin(&admin)?;

    if let Err(errors) = form.validate(false) {
        return Ok(field_error_response(errors));
    }

    let token = require_token(&session).await?;
    match state
        .backend()
        .update_user(UserId::new(id), &form.into_draft(), &token)
        .await
    {
        Ok(user) => Ok(Json(user).into_response()),
        Err(BackendError::Validation(message)) => {
            Ok(field_error_response(attribute_user_error(&message)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a user.
#[instrument(skip(admin, state, session), fields(user_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    require_user_admin(&admin)?;

    let token = require_token(&session).await?;
    state.backend().delete_user(UserId::new(id), &token).await?;

    Ok(Json(json!({ "message": "User deleted" })))
}

/// Trigger a password reset.
#[instrument(skip(admin, state, session), fields(user_id = %id))]
pub async fn reset_password(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    require_user_admin(&admin)?;

    let token = require_token(&session).await?;
    state
        .backend()
        .reset_password(UserId::new(id), &token)
        .await?;

    Ok(Json(json!({ "message": "Password reset email sent" })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> UserForm {
        UserForm {
            name: "Tran Thi B".to_owned(),
            email: "b@example.com".to_owned(),
            phone: Some("0912345678".to_owned()),
            role: Some(Role::Customer),
            password: Some("s3cure-pass".to_owned()),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate(true).is_ok());
    }

    #[test]
    fn test_create_requires_password() {
        let mut form = valid_form();
        form.password = None;
        assert!(form.validate(true).unwrap_err().contains_key("password"));
        // Updates don't need one
        assert!(form.validate(false).is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut form = valid_form();
        form.password = Some("short".to_owned());
        assert!(form.validate(true).unwrap_err().contains_key("password"));
    }

    #[test]
    fn test_role_is_required() {
        let mut form = valid_form();
        form.role = None;
        assert!(form.validate(true).unwrap_err().contains_key("role"));
    }

    #[test]
    fn test_empty_phone_is_allowed() {
        let mut form = valid_form();
        form.phone = Some(String::new());
        assert!(form.validate(true).is_ok());

        form.phone = Some("12345".to_owned());
        assert!(form.validate(true).is_err());
    }
}
