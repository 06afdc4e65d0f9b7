/**
 * Engagement Handlers
 *
 * HTTP handlers for `/api/favorites` and `/api/progress`. All routes are
 * public; the `deviceId` in the path or body scopes every operation.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::engagement::db::{self, ProgressWrite};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::extract::ApiJson;
use crate::backend::responses::MessageResponse;
use crate::backend::server::state::AppState;
use crate::shared::engagement::{
    Favorite, FavoriteStatus, NewFavorite, ProgressSummary, ProgressUpdate, ProgressUpsert,
    ReadingProgress,
};

// ----------------------------------------------------------------------------
// Favorites
// ----------------------------------------------------------------------------

/// GET /api/favorites/{device_id}
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> ApiResult<Json<Vec<Favorite>>> {
    Ok(Json(db::list_favorites(&state.db, &device_id).await?))
}

/// GET /api/favorites/{device_id}/{book_id}
pub async fn favorite_status(
    State(state): State<AppState>,
    Path((device_id, book_id)): Path<(String, i64)>,
) -> ApiResult<Json<FavoriteStatus>> {
    let favorite = db::get_favorite(&state.db, &device_id, book_id).await?;
    Ok(Json(FavoriteStatus {
        is_favorited: favorite.is_some(),
        favorite,
    }))
}

/// POST /api/favorites
///
/// # Errors
///
/// * `400 Bad Request` - Missing deviceId or bookId
/// * `404 Not Found` - The book does not exist
/// * `409 Conflict` - The device already favorited this book
pub async fn add_favorite(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewFavorite>,
) -> ApiResult<(StatusCode, Json<Favorite>)> {
    let (device_id, book_id) = payload.validate()?;

    let favorite = db::add_favorite(&state.db, &device_id, book_id)
        .await
        .map_err(|e| match BackendError::from(e) {
            BackendError::Conflict(_) => BackendError::conflict("Book already in favorites"),
            BackendError::NotFound(_) => BackendError::not_found("Book not found"),
            other => other,
        })?;

    tracing::debug!("Device {} favorited book {}", device_id, book_id);
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /api/favorites/{device_id}/{book_id}
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((device_id, book_id)): Path<(String, i64)>,
) -> ApiResult<Json<MessageResponse>> {
    if !db::remove_favorite(&state.db, &device_id, book_id).await? {
        return Err(BackendError::not_found("Favorite not found"));
    }
    Ok(Json(MessageResponse::new("Removed from favorites")))
}

/// DELETE /api/favorites/{id}
///
/// Shares its path segment with the device listing; here it is the row id.
pub async fn remove_favorite_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if !db::remove_favorite_by_id(&state.db, id).await? {
        return Err(BackendError::not_found("Favorite not found"));
    }
    Ok(Json(MessageResponse::new("Removed from favorites")))
}

// ----------------------------------------------------------------------------
// Reading progress
// ----------------------------------------------------------------------------

/// GET /api/progress/{device_id}
pub async fn list_progress(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> ApiResult<Json<Vec<ProgressSummary>>> {
    Ok(Json(db::list_progress(&state.db, &device_id).await?))
}

/// GET /api/progress/{device_id}/{book_id}
///
/// A device that has not started the book gets zeroed progress rather than
/// a 404.
pub async fn get_progress(
    State(state): State<AppState>,
    Path((device_id, book_id)): Path<(String, i64)>,
) -> ApiResult<Json<ReadingProgress>> {
    let progress = match db::get_progress(&state.db, &device_id, book_id).await? {
        Some(progress) => progress,
        None => {
            let total = db::count_chapters(&state.db, book_id).await?;
            ReadingProgress::empty(device_id, book_id, total)
        }
    };
    Ok(Json(progress))
}

/// POST /api/progress
///
/// Replaces the chapter set of the pair and recomputes the percentage.
/// Answers 201 when the pair had no progress yet, 200 otherwise.
pub async fn upsert_progress(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProgressUpsert>,
) -> ApiResult<(StatusCode, Json<ReadingProgress>)> {
    let (device_id, book_id, update) = payload.validate()?;
    let write = db::upsert_progress(&state.db, &device_id, book_id, &update).await?;
    let (progress, created) = saved_progress(write)?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(progress)))
}

/// POST /api/progress/{device_id}/{book_id}/chapters/{chapter_number}
pub async fn mark_chapter_read(
    State(state): State<AppState>,
    Path((device_id, book_id, chapter_number)): Path<(String, i64, i64)>,
) -> ApiResult<Json<ReadingProgress>> {
    if device_id.trim().is_empty() {
        return Err(BackendError::bad_request("deviceId is required"));
    }
    let write = db::mark_chapter_read(&state.db, &device_id, book_id, chapter_number).await?;
    let (progress, _) = saved_progress(write)?;
    Ok(Json(progress))
}

/// PUT /api/progress/{id}
pub async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<ProgressUpdate>,
) -> ApiResult<Json<ReadingProgress>> {
    let progress = db::update_progress_by_id(&state.db, id, &update)
        .await?
        .ok_or_else(|| BackendError::not_found("Progress not found"))?;
    Ok(Json(progress))
}

/// DELETE /api/progress/{id}
pub async fn delete_progress(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if !db::delete_progress(&state.db, id).await? {
        return Err(BackendError::not_found("Progress not found"));
    }
    Ok(Json(MessageResponse::new("Progress deleted successfully")))
}

fn saved_progress(write: ProgressWrite) -> ApiResult<(ReadingProgress, bool)> {
    match write {
        ProgressWrite::Saved { progress, created } => Ok((progress, created)),
        ProgressWrite::BookNotFound => Err(BackendError::not_found("Book not found")),
        ProgressWrite::ChapterNotFound => Err(BackendError::not_found("Chapter not found")),
    }
}
