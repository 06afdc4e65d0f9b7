/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is built once at startup and cloned into every request. It
 * holds:
 * - the SQLite connection pool (the only shared mutable resource)
 * - the session signing keys
 * - the PDF store rooted at the upload directory
 * - the loaded configuration
 *
 * Every field is cheap to clone (`Arc` or pool handle), so there is no
 * process-wide global.
 *
 * # Example
 *
 * ```rust,no_run
 * use bookblinks::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let _pool = &state.db;
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::uploads::storage::PdfStore;
use crate::shared::AppConfig;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub db: SqlitePool,
    /// Token signing keys
    pub sessions: SessionKeys,
    /// Storage for uploaded PDFs
    pub pdfs: PdfStore,
    /// Loaded configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        Self {
            db,
            sessions: SessionKeys::new(&config.jwt_secret),
            pdfs: PdfStore::new(config.upload_dir.clone()),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> SqlitePool {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(app_state: &AppState) -> SessionKeys {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for PdfStore {
    fn from_ref(app_state: &AppState) -> PdfStore {
        app_state.pdfs.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Arc<AppConfig> {
        app_state.config.clone()
    }
}
