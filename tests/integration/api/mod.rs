//! API integration tests
//!
//! Integration tests for all API endpoints

mod auth_test;
mod books_test;
mod chapters_test;
mod progress_test;
mod utility_test;
