//! Book Blinks - Main Library
//!
//! Book Blinks is a content-management and reading-progress API for short
//! book summaries ("blinks"). Administrators curate books and chapters and
//! attach PDFs; anonymous readers browse, favorite books and track their
//! progress chapter by chapter.
//!
//! # Module Structure
//!
//! The library is organized into two main modules:
//!
//! - **`shared`** - Domain types, validation, configuration
//!   - Books, chapters, favorites, reading progress
//!   - Progress derivation helpers
//!   - Error types
//!
//! - **`backend`** - The HTTP server
//!   - Axum router, middleware and handlers
//!   - SQLite persistence through sqlx
//!   - Authentication (bcrypt + JWT), PDF storage
//!
//! # Usage
//!
//! ```rust,no_run
//! use bookblinks::backend::server::init::create_app;
//! use bookblinks::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for validation failures
//! - `backend::error::BackendError` for everything returned over HTTP
//! - `shared::config::ConfigError` for startup configuration problems

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
