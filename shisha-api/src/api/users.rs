//! User profile endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use shisha_common::models::{User, UserActionDetail};

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = db::users::get_user(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {}", id)))?;
    Ok(Json(user))
}

/// GET /api/users/:id/actions
///
/// The user's like/dislike/order history, newest first, with nested mix
/// detail.
pub async fn list_user_actions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<UserActionDetail>>> {
    let actions = db::users::list_user_actions(&state.db, id).await?;
    Ok(Json(actions))
}

/// Build user routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/:id", get(get_user))
        .route("/api/users/:id/actions", get(list_user_actions))
}
