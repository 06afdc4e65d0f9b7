//! Engagement Module
//!
//! Per-device favorites and reading progress.
//!
//! # Module Structure
//!
//! ```text
//! engagement/
//! ├── mod.rs       - Module exports and documentation
//! ├── db.rs        - Favorite queries and transactional progress writes
//! └── handlers.rs  - /api/favorites and /api/progress handlers
//! ```

pub mod db;

pub mod handlers;
