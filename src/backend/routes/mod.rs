//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation, CORS and tracing layers
//! ├── api_routes.rs   - /api endpoints and their access layers
//! └── utility.rs      - Health, index and 404 fallback
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use bookblinks::backend::db::create_memory_pool;
//! use bookblinks::backend::routes::create_router;
//! use bookblinks::backend::server::state::AppState;
//! use bookblinks::shared::AppConfig;
//!
//! # async fn example() -> Result<(), sqlx::Error> {
//! let pool = create_memory_pool().await?;
//! let router = create_router(AppState::new(pool, AppConfig::default()));
//! # Ok(())
//! # }
//! ```

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

/// Health, index and fallback
pub mod utility;

pub use router::create_router;
