//! Liveness, API index and the JSON 404 fallback

use axum::response::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::backend::error::BackendError;

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Book Blinks API is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Book Blinks API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth",
            "books": "/api/books",
            "chapters": "/api/chapters",
            "upload": "/api/upload",
            "favorites": "/api/favorites",
            "progress": "/api/progress",
            "categories": "/api/categories",
            "search": "/api/search?q=",
            "health": "/health",
        },
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> BackendError {
    BackendError::not_found("Route not found")
}
