//! Catalog Module
//!
//! Books and chapters: storage queries and the HTTP handlers that expose
//! them.
//!
//! # Module Structure
//!
//! ```text
//! catalog/
//! ├── mod.rs       - Module exports and documentation
//! ├── db.rs        - SQLite queries (live chapter counts, cascade delete)
//! ├── handlers.rs  - /api/books and /api/chapters handlers
//! └── samples.rs   - Optional demo catalog loaded at startup
//! ```

pub mod db;

pub mod handlers;

pub mod samples;
