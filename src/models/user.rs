use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, first_name, last_name, email, password, picture_path, friends, \
     location, occupation, viewed_profile, impressions, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String, // argon2 PHC string
    pub picture_path: String,
    pub friends: Vec<Uuid>,
    pub location: Option<String>,
    pub occupation: Option<String>,
    pub viewed_profile: i32,
    pub impressions: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration data after the multipart form has been read.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub picture_path: String,
    pub location: Option<String>,
    pub occupation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user. The password hash never leaves the model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub picture_path: String,
    pub friends: Vec<Uuid>,
    pub location: Option<String>,
    pub occupation: Option<String>,
    pub viewed_profile: i32,
    pub impressions: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub picture_path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Password hashing error: {0}")]
    PasswordHashError(String),
    #[error("Password verification failed")]
    PasswordVerificationFailed,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already exists")]
    EmailAlreadyExists,
    #[error("A user cannot befriend themselves")]
    SelfFriendship,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            picture_path: user.picture_path.clone(),
            friends: user.friends.clone(),
            location: user.location.clone(),
            occupation: user.occupation.clone(),
            viewed_profile: user.viewed_profile,
            impressions: user.impressions,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for FriendResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            occupation: user.occupation,
            location: user.location,
            picture_path: user.picture_path,
        }
    }
}

impl User {
    pub async fn create(pool: &PgPool, new_user: NewUser) -> Result<User, UserError> {
        let password_hash = Self::hash_password(&new_user.password)?;

        let mut tx = pool.begin().await?;

        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(&new_user.email)
            .fetch_optional(&mut *tx)
            .await?;

        if existing.is_some() {
            return Err(UserError::EmailAlreadyExists);
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password, picture_path,
                               location, occupation, viewed_profile, impressions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(&new_user.picture_path)
        .bind(&new_user.location)
        .bind(&new_user.occupation)
        .bind(random_counter())
        .bind(random_counter())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                UserError::EmailAlreadyExists
            }
            other => UserError::DatabaseError(other),
        })?;

        tx.commit().await?;

        Ok(user)
    }

    pub async fn authenticate(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<User, UserError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?
        .ok_or(UserError::UserNotFound)?;

        if Self::verify_password(password, &user.password)? {
            Ok(user)
        } else {
            Err(UserError::PasswordVerificationFailed)
        }
    }

    pub async fn get_by_id(pool: &PgPool, user_id: Uuid) -> Result<User, UserError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    pub async fn get_friends(&self, pool: &PgPool) -> Result<Vec<FriendResponse>, UserError> {
        let friends = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(&self.friends)
        .fetch_all(pool)
        .await?;

        // Keep the order in which friendships were made
        let mut ordered: Vec<FriendResponse> = Vec::with_capacity(friends.len());
        for friend_id in &self.friends {
            if let Some(friend) = friends.iter().find(|f| f.id == *friend_id) {
                ordered.push(FriendResponse::from(friend.clone()));
            }
        }

        Ok(ordered)
    }

    /// Adds or removes a friendship on both sides in one transaction and
    /// returns the updated user.
    pub async fn toggle_friend(
        pool: &PgPool,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<User, UserError> {
        if user_id == friend_id {
            return Err(UserError::SelfFriendship);
        }

        let mut tx = pool.begin().await?;

        let locked: Vec<(Uuid, Vec<Uuid>)> = sqlx::query_as(
            "SELECT id, friends FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(vec![user_id, friend_id])
        .fetch_all(&mut *tx)
        .await?;

        if locked.len() != 2 {
            return Err(UserError::UserNotFound);
        }

        let already_friends = locked
            .iter()
            .find(|(id, _)| *id == user_id)
            .is_some_and(|(_, friends)| friends.contains(&friend_id));

        let statement = if already_friends {
            "UPDATE users SET friends = array_remove(friends, $2), updated_at = NOW() WHERE id = $1"
        } else {
            "UPDATE users SET friends = array_append(array_remove(friends, $2), $2), \
             updated_at = NOW() WHERE id = $1"
        };

        for (owner, other) in [(user_id, friend_id), (friend_id, user_id)] {
            sqlx::query(statement)
                .bind(owner)
                .bind(other)
                .execute(&mut *tx)
                .await?;
        }

        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        tracing::debug!(
            "Friendship between {} and {} {}",
            user_id,
            friend_id,
            if already_friends { "removed" } else { "added" }
        );

        Ok(user)
    }

    fn hash_password(password: &str) -> Result<String, UserError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHashError(e.to_string()))
    }

    fn verify_password(password: &str, hash: &str) -> Result<bool, UserError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHashError(e.to_string()))?;

        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}

/// Seed value for the profile view and impression counters.
fn random_counter() -> i32 {
    (OsRng.next_u32() % 10_000) as i32
}
