//! Backend Module
//!
//! This module contains all server-side code for the Book Blinks API: an
//! Axum HTTP server over a SQLite database, with PDF files on local disk.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, startup seeding
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Administrator accounts, JWT sessions, `/api/auth`
//! - **`middleware`** - Session verification and the admin gate
//! - **`catalog`** - Books and chapters
//! - **`engagement`** - Favorites and reading progress per device
//! - **`uploads`** - PDF intake, storage and retrieval
//! - **`search`** - Categories and search
//! - **`db`** - Connection pool and migrations
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── catalog/        - Books and chapters
//! ├── engagement/     - Favorites and progress
//! ├── uploads/        - PDF files
//! ├── search/         - Categories and search
//! ├── db/             - SQLite pool
//! ├── error/          - Error types
//! ├── extract.rs      - JSON extractor with API errors
//! └── responses.rs    - Shared response bodies
//! ```
//!
//! # State Management
//!
//! `AppState` holds the pool, the session keys, the PDF store and the
//! configuration. Handlers pick what they need through `State<AppState>`
//! or the `FromRef` sub-states.
//!
//! # Concurrency
//!
//! Handlers share nothing but the pool. Uniqueness is enforced by database
//! constraints and multi-statement writes run in transactions, so
//! concurrent requests never need an in-process lock.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Books and chapters
pub mod catalog;

/// Favorites and reading progress
pub mod engagement;

/// PDF uploads
pub mod uploads;

/// Categories and search
pub mod search;

/// Database pool
pub mod db;

/// Request extractors
pub mod extract;

/// Shared response bodies
pub mod responses;

pub use error::BackendError;
pub use server::create_app;
