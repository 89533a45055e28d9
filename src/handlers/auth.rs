use axum::{extract::State, http::StatusCode, Json};

use crate::models::{LoginRequest, NewUser, UserError, UserResponse};
use crate::routes::AppState;
use crate::services::{AuthServiceError, LoginResponse};
use crate::upload::UploadForm;
use crate::utils::validation::validators;
use crate::utils::{ApiError, Payload, ResponseBuilder};

/// Handle user registration
/// POST /auth/register (multipart, optional `picture` file)
pub async fn register(
    State(state): State<AppState>,
    form: UploadForm,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let text = |name: &str| form.text(name).unwrap_or_default().trim().to_string();
    let optional = |name: &str| {
        form.text(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    };

    let new_user = NewUser {
        first_name: text("firstName"),
        last_name: text("lastName"),
        email: text("email"),
        password: form.text("password").unwrap_or_default().to_string(),
        picture_path: optional("picturePath")
            .or_else(|| form.picture().map(|picture| picture.original_name.clone()))
            .unwrap_or_default(),
        location: optional("location"),
        occupation: optional("occupation"),
    };

    tracing::info!("User registration attempt for email: {}", new_user.email);

    validators::validate_user_registration(
        &new_user.first_name,
        &new_user.last_name,
        &new_user.email,
        &new_user.password,
    )
    .map_err(|errors| {
        tracing::warn!("Registration failed: invalid input");
        ResponseBuilder::validation_error(errors.into_field_errors())
    })?;

    match state.auth_service.register_user(new_user).await {
        Ok(user) => {
            tracing::info!("User registration successful: {}", user.id);
            Ok((StatusCode::CREATED, Json(user)))
        }
        Err(AuthServiceError::UserError(UserError::EmailAlreadyExists)) => {
            tracing::warn!("Registration failed: Email already exists");
            Err(ResponseBuilder::conflict("Email already exists"))
        }
        Err(e) => {
            tracing::error!("Registration failed with error: {}", e);
            Err(ResponseBuilder::internal_server_error("Registration failed"))
        }
    }
}

/// Handle user login
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Payload(request): Payload<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    tracing::info!("User login attempt for email: {}", request.email);

    match state.auth_service.login_user(request).await {
        Ok(response) => {
            tracing::info!("User login successful");
            Ok(Json(response))
        }
        Err(AuthServiceError::UserError(UserError::UserNotFound)) => {
            tracing::warn!("Login failed: User not found");
            Err(ResponseBuilder::bad_request("User does not exist."))
        }
        Err(AuthServiceError::UserError(UserError::PasswordVerificationFailed)) => {
            tracing::warn!("Login failed: Password verification failed");
            Err(ResponseBuilder::bad_request("Invalid credentials."))
        }
        Err(e) => {
            tracing::error!("Login failed with error: {}", e);
            Err(ResponseBuilder::internal_server_error("Login failed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserialization() {
        let json = r#"{
            "email": "test@example.com",
            "password": "Password123"
        }"#;

        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.email, "test@example.com");
        assert_eq!(request.password, "Password123");
    }
}
