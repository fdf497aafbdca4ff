//! Staff authentication handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Logged-in admin view.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub admin: CurrentAdmin,
}

/// Staff login.
///
/// The staff-role check here only decides whether the panel opens; the
/// backend still authorizes every call this session makes.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<SessionView>> {
    let response = state.backend().login(&body.email, &body.password).await?;

    if !response.user.is_staff() {
        return Err(AppError::Unauthorized(
            "This account has no access to the admin panel".to_owned(),
        ));
    }

    let admin = CurrentAdmin {
        id: response.user.id,
        name: response.user.name.clone(),
        email: response.user.email.clone(),
        roles: response.user.roles.clone(),
    };

    session
        .insert(session_keys::TOKEN, &response.token)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store token: {e}")))?;
    session
        .insert(session_keys::CURRENT_ADMIN, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store admin: {e}")))?;

    Ok(Json(SessionView { admin }))
}

/// Log out: drop the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}
