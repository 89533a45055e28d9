use crate::config::Config;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

pub type DatabasePool = PgPool;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] sqlx::Error),
    #[error("Database migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),
    #[error("Database operation failed: {0}")]
    OperationFailed(sqlx::Error),
}

fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
}

/// Opens the pool with a single connection attempt. There is no retry loop:
/// a failure here is fatal to startup.
pub async fn create_connection_pool(config: &Config) -> Result<DatabasePool, DatabaseError> {
    tracing::info!("Creating database connection pool");

    let pool = pool_options(config)
        .connect(&config.database_url)
        .await
        .map_err(DatabaseError::ConnectionFailed)?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Builds a pool that connects on first use. Used by router tests that never
/// reach the database.
pub fn create_lazy_pool(config: &Config) -> Result<DatabasePool, DatabaseError> {
    pool_options(config)
        .connect_lazy(&config.database_url)
        .map_err(DatabaseError::ConnectionFailed)
}

pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations").run(pool).await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

pub async fn health_check(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DatabaseError::OperationFailed)?;

    Ok(())
}
