//! Uploads Module
//!
//! PDF files for books and chapters.
//!
//! # Module Structure
//!
//! ```text
//! uploads/
//! ├── mod.rs       - Module exports and documentation
//! ├── storage.rs   - On-disk layout and size-limited streaming writer
//! ├── pdf.rs       - Content type check and page counting
//! └── handlers.rs  - /api/upload handlers
//! ```

pub mod handlers;

pub mod pdf;

pub mod storage;

pub use storage::{PdfKind, PdfStore};
