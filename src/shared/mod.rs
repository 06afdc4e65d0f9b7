//! Shared Module
//!
//! This module contains the domain types of the Book Blinks API: catalog
//! entries, reader engagement records, validation errors and configuration.
//!
//! # Overview
//!
//! Types here carry no HTTP or storage behavior of their own. They are
//! serialized to the JSON wire format (camelCase) and loaded from SQLite rows
//! by the `backend` module.

/// Books, chapters and their request payloads
pub mod catalog;

/// Favorites and reading progress
pub mod engagement;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use catalog::{Book, BookWithChapters, CategoryCount, Chapter};
pub use config::{AdminSeed, AppConfig, AppConfigBuilder, ConfigError};
pub use engagement::{Favorite, FavoriteStatus, ProgressSummary, ReadingProgress};
pub use error::SharedError;
