//! Customer order view.

use axum::{
    Json,
    extract::{Path, State},
};
use tower_sessions::Session;
use tracing::instrument;

use aims_core::{Order, OrderId};

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::routes::cart::session_token;
use crate::state::AppState;

/// View one of the customer's orders.
///
/// The backend scopes the lookup to the bearer token's owner; asking for
/// someone else's order comes back 403/404 from there.
#[instrument(skip(state, session, _user), fields(order_id = %id))]
pub async fn show(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let token = session_token(&session)
        .await
        .ok_or_else(|| AppError::Unauthorized("Session has no token".to_owned()))?;

    let order = state
        .backend()
        .order(OrderId::new(id), Some(&token))
        .await?;

    Ok(Json(order))
}
