pub mod auth;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod startup;
pub mod upload;
pub mod utils;

pub use config::Config;
pub use db::{create_connection_pool, run_migrations, DatabasePool};
pub use routes::{create_api_router, AppState};
pub use startup::{run, StartupError};
