pub mod api;

use axum::extract::FromRef;
use std::sync::Arc;

use crate::auth::{AuthState, JwtService};
use crate::config::Config;
use crate::db::DatabasePool;
use crate::services::{AssetStorage, AuthService};

/// Dependencies shared by every handler. Built once at startup and cloned
/// into each request; nothing in here is mutable.
#[derive(Clone)]
pub struct AppState {
    pub pool: DatabasePool,
    pub auth_service: Arc<AuthService>,
    pub asset_storage: Arc<AssetStorage>,
    pub auth_state: AuthState,
}

impl AppState {
    pub fn new(pool: DatabasePool, config: &Config) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));
        let auth_service = Arc::new(AuthService::new(jwt_service.clone(), pool.clone()));
        let asset_storage = Arc::new(AssetStorage::new(&config.assets_dir));

        Self {
            pool,
            auth_service,
            asset_storage,
            auth_state: AuthState { jwt_service },
        }
    }
}

impl FromRef<AppState> for Arc<AssetStorage> {
    fn from_ref(state: &AppState) -> Self {
        state.asset_storage.clone()
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth_state.clone()
    }
}

pub use api::create_api_router;
