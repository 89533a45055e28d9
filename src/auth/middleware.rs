use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwt::{AuthError, JwtService};
use crate::utils::{ApiError, ResponseBuilder};

#[derive(Clone)]
pub struct AuthState {
    pub jwt_service: Arc<JwtService>,
}

/// Identity attached to a request once its bearer token has been verified.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

// Extractor for routes behind `require_auth`
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ResponseBuilder::unauthorized("Authentication required"))
    }
}

/// Verifies the bearer token before anything else on the route runs.
///
/// A missing `Authorization` header is answered with 403, a malformed header or
/// an invalid token with 401. On success the caller's identity is stored in the
/// request extensions for [`AuthenticatedUser`].
pub async fn require_auth(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ResponseBuilder::forbidden("Access Denied"))?
        .to_str()
        .map_err(|_| ResponseBuilder::unauthorized("Invalid authorization header format"))?;

    let token = JwtService::extract_token_from_header(auth_header)
        .map_err(|e| ResponseBuilder::unauthorized(e.to_string()))?;

    let claims = auth_state
        .jwt_service
        .validate_user_token(token)
        .map_err(|e| {
            tracing::warn!("Rejected bearer token: {}", e);
            match e {
                AuthError::TokenExpired => ResponseBuilder::unauthorized("Token expired"),
                _ => ResponseBuilder::unauthorized(format!("Token validation failed: {e}")),
            }
        })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.upn,
    });

    Ok(next.run(request).await)
}
