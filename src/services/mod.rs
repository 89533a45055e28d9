pub mod asset_storage;
pub mod auth_service;

pub use asset_storage::{AssetStorage, StorageError};
pub use auth_service::{AuthService, AuthServiceError, LoginResponse};
