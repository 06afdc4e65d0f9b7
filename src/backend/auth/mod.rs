//! Authentication Module
//!
//! This module handles administrator authentication: credential checks,
//! signed session tokens and the HTTP handlers under `/api/auth`.
//!
//! # Architecture
//!
//! - **`users`** - User data model and database operations
//! - **`password`** - bcrypt hashing on the blocking pool
//! - **`sessions`** - JWT token generation, validation and the session cookie
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── password.rs     - Password hashing
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: first administrator only, while no users exist
//! 2. **Login**: username or email + password → token (body and cookie)
//! 3. **Protected routes**: token from `Authorization: Bearer` or cookie
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs that expire after 7 days
//! - Invalid credentials return 401 without revealing which part was wrong

/// User data model and database operations
pub mod users;

/// Password hashing
pub mod password;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{change_password, get_me, login, logout, register, verify};
pub use sessions::{Claims, SessionKeys};
