//! Customer authentication handlers.
//!
//! Credentials are exchanged with the backend for a bearer token; the
//! token and a user snapshot live in the session. The token travels on
//! every subsequent backend call - the session never becomes an authority
//! of its own.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Logged-in user view.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: CurrentUser,
}

/// Log in against the backend and store the session.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<SessionView>> {
    let response = state.backend().login(&body.email, &body.password).await?;

    let user = CurrentUser {
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
        .insert(session_keys::CURRENT_USER, &user)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store user: {e}")))?;

    Ok(Json(SessionView { user }))
}

/// Log out: drop the whole session (token, user, cart, checkout).
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}
