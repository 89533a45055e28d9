use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error body returned by every handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: None,
        }
    }
}

/// Rejection type shared by handlers and extractors.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Response builder for consistent API errors
pub struct ResponseBuilder;

impl ResponseBuilder {
    pub fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
        (status, Json(ErrorResponse::new(message)))
    }

    /// Create a validation error response
    pub fn validation_error(field_errors: HashMap<String, Vec<String>>) -> ApiError {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                message: "Request validation failed".to_string(),
                field_errors: Some(field_errors),
            }),
        )
    }

    pub fn bad_request(message: impl Into<String>) -> ApiError {
        Self::error(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> ApiError {
        Self::error(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> ApiError {
        Self::error(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(resource: &str) -> ApiError {
        Self::error(StatusCode::NOT_FOUND, format!("{resource} not found"))
    }

    pub fn conflict(message: impl Into<String>) -> ApiError {
        Self::error(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> ApiError {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}
