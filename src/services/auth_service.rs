use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::{AuthError, JwtService};
use crate::models::user::{LoginRequest, NewUser, User, UserError, UserResponse};

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub token_type: String,
    pub user: UserResponse,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("User error: {0}")]
    UserError(#[from] UserError),
    #[error("JWT error: {0}")]
    JwtError(#[from] AuthError),
}

pub struct AuthService {
    jwt_service: Arc<JwtService>,
    pool: PgPool,
}

impl AuthService {
    pub fn new(jwt_service: Arc<JwtService>, pool: PgPool) -> Self {
        Self { jwt_service, pool }
    }

    pub async fn register_user(&self, new_user: NewUser) -> Result<UserResponse, AuthServiceError> {
        let user = User::create(&self.pool, new_user).await?;

        Ok(UserResponse::from(&user))
    }

    pub async fn login_user(&self, request: LoginRequest) -> Result<LoginResponse, AuthServiceError> {
        let user = User::authenticate(&self.pool, &request.email, &request.password).await?;

        let token = self.jwt_service.create_user_token(user.id, &user.email)?;

        Ok(LoginResponse {
            token,
            expires_in: self.jwt_service.expires_in(),
            token_type: "Bearer".to_string(),
            user: UserResponse::from(&user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_login_response_serialization() {
        let response = LoginResponse {
            token: "test-token".to_string(),
            expires_in: 7200,
            token_type: "Bearer".to_string(),
            user: UserResponse {
                id: Uuid::new_v4(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                picture_path: String::new(),
                friends: vec![],
                location: None,
                occupation: None,
                viewed_profile: 0,
                impressions: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "test-token");
        assert_eq!(json["expires_in"], 7200);
        assert_eq!(json["user"]["email"], "ada@example.com");
        assert!(json["user"].get("password").is_none());
    }
}
