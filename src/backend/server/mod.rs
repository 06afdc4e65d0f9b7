//! Server Module
//!
//! This module contains the code that initializes and configures the Axum
//! HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Database loading and administrator seeding
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: `AppConfig::from_env` (done by the binary)
//! 2. **Database**: pool creation and migrations
//! 3. **Seeding**: default administrator when none exists
//! 4. **Router**: routes, access layers, CORS and tracing
//!
//! # Example
//!
//! ```rust,no_run
//! use bookblinks::backend::server::create_app;
//! use bookblinks::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(AppConfig::from_env()?).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Startup resources
pub mod config;

/// Server initialization
pub mod init;

pub use init::{create_app, create_app_with_pool, StartupError};
pub use state::AppState;
