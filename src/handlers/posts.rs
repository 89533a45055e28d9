use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::models::{LikePostRequest, Post, PostError, PostResponse, User, UserError};
use crate::routes::AppState;
use crate::upload::UploadForm;
use crate::utils::{ApiError, Payload, ResponseBuilder};

async fn feed(state: &AppState) -> Result<Vec<PostResponse>, ApiError> {
    let posts = Post::list_all(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to load feed: {}", e);
        ResponseBuilder::not_found("Posts")
    })?;

    Ok(posts.into_iter().map(PostResponse::from).collect())
}

/// Handle post creation
/// POST /posts (multipart, optional `picture` file)
///
/// The author is the form's `userId`, or the caller when the field is absent.
/// Answers with the whole feed.
pub async fn create_post(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    form: UploadForm,
) -> Result<(StatusCode, Json<Vec<PostResponse>>), ApiError> {
    let author_id = match form.text("userId").map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => Uuid::parse_str(raw)
            .map_err(|_| ResponseBuilder::bad_request("Invalid userId"))?,
        None => auth_user.user_id,
    };

    tracing::info!("Post creation by {} for author {}", auth_user.user_id, author_id);

    let author = match User::get_by_id(&state.pool, author_id).await {
        Ok(user) => user,
        Err(UserError::UserNotFound) => return Err(ResponseBuilder::not_found("User")),
        Err(e) => {
            tracing::error!("Post creation failed loading author: {}", e);
            return Err(ResponseBuilder::internal_server_error("Post creation failed"));
        }
    };

    let description = form
        .text("description")
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let picture_path = form
        .text("picturePath")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| form.picture().map(|picture| picture.original_name.as_str()));

    let post = Post::create(&state.pool, &author, description, picture_path)
        .await
        .map_err(|e| {
            tracing::error!("Post creation failed: {}", e);
            ResponseBuilder::conflict("Post creation failed")
        })?;

    tracing::info!("Post {} created", post.id);

    Ok((StatusCode::CREATED, Json(feed(&state).await?)))
}

/// GET /posts
pub async fn get_feed_posts(
    _auth_user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    Ok(Json(feed(&state).await?))
}

/// GET /posts/:id/posts
pub async fn get_user_posts(
    _auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = Post::list_by_user(&state.pool, user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load posts of {}: {}", user_id, e);
            ResponseBuilder::not_found("Posts")
        })?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// PATCH /posts/:id/like
pub async fn like_post(
    _auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Payload(request): Payload<LikePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    match Post::toggle_like(&state.pool, post_id, request.user_id).await {
        Ok(post) => Ok(Json(PostResponse::from(post))),
        Err(PostError::PostNotFound) => Err(ResponseBuilder::not_found("Post")),
        Err(e) => {
            tracing::error!("Like toggle failed for post {}: {}", post_id, e);
            Err(ResponseBuilder::not_found("Post"))
        }
    }
}
