use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::user::User;

const POST_COLUMNS: &str = "id, user_id, first_name, last_name, location, description, \
     picture_path, user_picture_path, likes, comments, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub picture_path: Option<String>,
    pub user_picture_path: String,
    pub likes: Vec<Uuid>,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikePostRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub picture_path: Option<String>,
    pub user_picture_path: String,
    /// Liking user ids mapped to `true`.
    pub likes: BTreeMap<String, bool>,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Post not found")]
    PostNotFound,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            first_name: post.first_name,
            last_name: post.last_name,
            location: post.location,
            description: post.description,
            picture_path: post.picture_path,
            user_picture_path: post.user_picture_path,
            likes: post
                .likes
                .into_iter()
                .map(|user_id| (user_id.to_string(), true))
                .collect(),
            comments: post.comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl Post {
    /// Inserts a post, copying the author's display fields onto it.
    pub async fn create(
        pool: &PgPool,
        author: &User,
        description: Option<&str>,
        picture_path: Option<&str>,
    ) -> Result<Post, PostError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (id, user_id, first_name, last_name, location, description,
                               picture_path, user_picture_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(author.id)
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.location)
        .bind(description)
        .bind(picture_path)
        .bind(&author.picture_path)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Every post, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Post>, PostError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Post>, PostError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Adds `user_id` to the post's likes, or removes it if already present,
    /// in a single statement.
    pub async fn toggle_like(
        pool: &PgPool,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Post, PostError> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET likes = CASE
                    WHEN $2 = ANY(likes) THEN array_remove(likes, $2)
                    ELSE array_append(likes, $2)
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(PostError::PostNotFound)
    }
}
