//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs             - Module exports and documentation
//! ├── types.rs           - Request and response types
//! ├── register.rs        - First-administrator bootstrap
//! ├── login.rs           - User authentication handler
//! ├── logout.rs          - Cookie removal
//! ├── verify.rs          - Token check
//! ├── me.rs              - Get current user handler
//! └── change_password.rs - Password change
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`logout`** - POST /api/auth/logout
//! - **`verify`** - GET /api/auth/verify (authenticated)
//! - **`get_me`** - GET /api/auth/me (authenticated)
//! - **`change_password`** - PUT /api/auth/change-password (authenticated)

/// Request and response types
pub mod types;

pub mod register;

pub mod login;

pub mod logout;

pub mod verify;

pub mod me;

pub mod change_password;

pub use types::{AuthResponse, LoginRequest, UserResponse};

pub use change_password::change_password;
pub use login::login;
pub use logout::logout;
pub use me::get_me;
pub use register::register;
pub use verify::verify;
