//! Backend Error Module
//!
//! This module defines the error type returned by every HTTP handler and
//! its conversion into JSON error responses.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError` definition, status and code mapping
//! - **`conversion`** - `IntoResponse` and `From` implementations
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use bookblinks::backend::error::BackendError;
//! use axum::Json;
//!
//! async fn handler() -> Result<Json<()>, BackendError> {
//!     Err(BackendError::not_found("Book not found"))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;

/// Result alias used by handlers
pub type ApiResult<T> = Result<T, BackendError>;
