use std::future::Future;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::db::{create_connection_pool, run_migrations, DatabaseError};
use crate::routes::{create_api_router, AppState};
use crate::services::{AssetStorage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("Asset directory unavailable: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Connects to the database, then serves the API until `shutdown` resolves.
///
/// The listener is bound only after the database connection succeeded, so a
/// failed connection leaves nothing listening.
pub async fn run<F>(config: Config, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let pool = create_connection_pool(&config).await.map_err(|e| {
        tracing::error!("{} did not connect", e);
        e
    })?;

    run_migrations(&pool).await?;

    AssetStorage::new(&config.assets_dir).ensure_dir().await?;

    let app = create_api_router(AppState::new(pool.clone(), &config), &config);

    let address = config.server_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    tracing::info!("Server is running on port: {}", config.port);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    pool.close().await;
    tracing::info!("Server shutdown complete");

    served.map_err(StartupError::Serve)
}
