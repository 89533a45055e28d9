use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::models::{FriendResponse, User, UserError, UserResponse};
use crate::routes::AppState;
use crate::utils::{ApiError, ResponseBuilder};

fn user_error(e: UserError) -> ApiError {
    match e {
        UserError::UserNotFound => ResponseBuilder::not_found("User"),
        UserError::SelfFriendship => {
            ResponseBuilder::bad_request("A user cannot befriend themselves")
        }
        other => {
            tracing::error!("User lookup failed: {}", other);
            ResponseBuilder::internal_server_error("Failed to load user")
        }
    }
}

/// GET /users/:id
pub async fn get_user(
    _auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::get_by_id(&state.pool, user_id)
        .await
        .map_err(user_error)?;

    Ok(Json(UserResponse::from(&user)))
}

/// GET /users/:id/friends
pub async fn get_user_friends(
    _auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<FriendResponse>>, ApiError> {
    let user = User::get_by_id(&state.pool, user_id)
        .await
        .map_err(user_error)?;

    let friends = user.get_friends(&state.pool).await.map_err(user_error)?;

    Ok(Json(friends))
}

/// PATCH /users/:id/:friend_id
///
/// Toggles the friendship and answers with the user's updated friend list.
pub async fn add_remove_friend(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Path((user_id, friend_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<FriendResponse>>, ApiError> {
    tracing::info!(
        "Friend toggle by {} for user {} and friend {}",
        auth_user.user_id,
        user_id,
        friend_id
    );

    let user = User::toggle_friend(&state.pool, user_id, friend_id)
        .await
        .map_err(user_error)?;

    let friends = user.get_friends(&state.pool).await.map_err(user_error)?;

    Ok(Json(friends))
}
