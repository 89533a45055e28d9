use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_ISSUER: &str = "sociopedia";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: Uuid,
    pub upn: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT token creation failed: {0}")]
    TokenCreationFailed(#[from] jsonwebtoken::errors::Error),
    #[error("JWT token validation failed: {0}")]
    TokenValidationFailed(String),
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid authorization header format")]
    InvalidAuthHeaderFormat,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: Duration,
}

impl JwtService {
    pub fn new(secret: &str, token_lifetime_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_lifetime: Duration::hours(token_lifetime_hours),
        }
    }

    /// Lifetime of issued tokens in seconds.
    pub fn expires_in(&self) -> i64 {
        self.token_lifetime.num_seconds()
    }

    pub fn create_user_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id,
            upn: email.to_string(),
            exp: (now + self.token_lifetime).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::from)
    }

    pub fn validate_user_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[TOKEN_ISSUER]);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(token_data) => Ok(token_data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(AuthError::TokenExpired),
                _ => Err(AuthError::TokenValidationFailed(e.to_string())),
            },
        }
    }

    pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AuthError> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(AuthError::InvalidAuthHeaderFormat),
        }
    }
}
