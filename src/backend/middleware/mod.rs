//! Middleware Module
//!
//! This module contains the HTTP middleware of the backend server.
//!
//! # Architecture
//!
//! - **`auth`** - Session verification and the admin gate
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::post, Router};
//! use bookblinks::backend::middleware::{auth_middleware, require_admin};
//! use bookblinks::backend::server::state::AppState;
//!
//! fn admin_routes(state: AppState) -> Router<AppState> {
//!     Router::new()
//!         .route("/api/books", post(|| async { "created" }))
//!         .route_layer(middleware::from_fn(require_admin))
//!         .route_layer(middleware::from_fn_with_state(state, auth_middleware))
//! }
//! ```

pub mod auth;

pub use auth::{auth_middleware, require_admin, AuthUser, AuthenticatedUser};
