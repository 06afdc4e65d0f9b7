/**
 * Search Handlers
 *
 * - `GET /api/categories` - Category counts
 * - `GET /api/search?q=` - Search books and chapter summaries
 */

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::backend::error::{ApiResult, BackendError};
use crate::backend::search::db;
use crate::backend::server::state::AppState;
use crate::shared::catalog::{Book, CategoryCount};

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CategoryCount>>> {
    Ok(Json(db::list_categories(&state.db).await?))
}

/// GET /api/search
///
/// # Errors
///
/// * `400 Bad Request` - `q` missing or blank
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Book>>> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| BackendError::bad_request("Search query is required"))?;

    let books = db::search_books(&state.db, query).await?;
    tracing::debug!("Search {:?} matched {} book(s)", query, books.len());
    Ok(Json(books))
}
