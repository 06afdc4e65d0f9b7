//! Search Module
//!
//! Category aggregation and full-text-ish search over the catalog.

pub mod db;

pub mod handlers;
