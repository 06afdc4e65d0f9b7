/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including state creation, database loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Open the database and run migrations
 * 2. Seed the default administrator if none exists
 * 3. Load the sample catalog if enabled
 * 4. Create the upload directories
 * 5. Build `AppState` and the router
 */

use axum::Router;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{ensure_default_admin, ensure_sample_catalog, load_database};
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Failures that stop the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("upload directory error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("failed to seed administrator: {0}")]
    Seed(#[from] BackendError),
}

/// Create and configure the Axum application
///
/// # Errors
///
/// Returns `StartupError` if the database cannot be opened or migrated,
/// the default administrator cannot be written, or the upload directory
/// cannot be created.
pub async fn create_app(config: AppConfig) -> Result<Router<()>, StartupError> {
    tracing::info!("Initializing Book Blinks backend server");

    let pool = load_database(&config).await?;
    create_app_with_pool(pool, config).await
}

/// Build the application on an already migrated pool
pub async fn create_app_with_pool(
    pool: SqlitePool,
    config: AppConfig,
) -> Result<Router<()>, StartupError> {
    ensure_default_admin(&pool, &config).await?;
    ensure_sample_catalog(&pool, &config).await?;

    let app_state = AppState::new(pool, config);
    app_state.pdfs.ensure_dirs().await?;
    tracing::info!("Storing uploads under {}", app_state.pdfs.root().display());

    let app = create_router(app_state);
    tracing::info!("Router configured");

    Ok(app)
}
