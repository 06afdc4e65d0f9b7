/**
 * Catalog Handlers
 *
 * HTTP handlers for `/api/books` and `/api/chapters`. Reads are public;
 * writes are mounted behind the admin gate by the router.
 *
 * Deleting a book or chapter removes its stored PDFs after the database
 * change commits. File removal failures are logged and do not fail the
 * request.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::catalog::db;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::extract::ApiJson;
use crate::backend::responses::MessageResponse;
use crate::backend::server::state::AppState;
use crate::shared::catalog::{
    Book, BookUpdate, BookWithChapters, Chapter, ChapterUpdate, NewBook, NewChapter,
};

/// GET /api/books
pub async fn list_books(State(state): State<AppState>) -> ApiResult<Json<Vec<Book>>> {
    Ok(Json(db::list_books(&state.db).await?))
}

/// GET /api/books/category/{category}
pub async fn list_books_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Json<Vec<Book>>> {
    Ok(Json(db::list_books_by_category(&state.db, &category).await?))
}

/// GET /api/books/{id}
///
/// Returns the book with its chapters ordered by chapter number.
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BookWithChapters>> {
    let book = db::get_book(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Book not found"))?;
    let chapters = db::list_chapters(&state.db, id).await?;
    Ok(Json(BookWithChapters { book, chapters }))
}

/// POST /api/books
pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewBook>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let draft = payload.validate()?;
    let book = db::create_book(&state.db, &draft, None).await?;
    tracing::info!("Created book {} ({})", book.id, book.title);
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /api/books/{id}
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<BookUpdate>,
) -> ApiResult<Json<Book>> {
    let update = payload.validate()?;
    let book = db::update_book(&state.db, id, &update)
        .await?
        .ok_or_else(|| BackendError::not_found("Book not found"))?;
    Ok(Json(book))
}

/// DELETE /api/books/{id}
///
/// Chapters, favorites and progress rows go with the book through
/// `ON DELETE CASCADE`.
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let pdf_paths = db::delete_book(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Book not found"))?;

    state.pdfs.remove_all(&pdf_paths).await;
    tracing::info!("Deleted book {} and {} stored PDF(s)", id, pdf_paths.len());

    Ok(Json(MessageResponse::new("Book deleted successfully")))
}

/// GET /api/chapters/book/{book_id}
pub async fn list_book_chapters(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> ApiResult<Json<Vec<Chapter>>> {
    Ok(Json(db::list_chapters(&state.db, book_id).await?))
}

/// GET /api/chapters/{id}
pub async fn get_chapter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Chapter>> {
    let chapter = db::get_chapter(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Chapter not found"))?;
    Ok(Json(chapter))
}

/// POST /api/chapters
///
/// # Errors
///
/// * `400 Bad Request` - Missing field or non-positive number
/// * `404 Not Found` - The book does not exist
/// * `409 Conflict` - The book already has this chapter number
pub async fn create_chapter(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewChapter>,
) -> ApiResult<(StatusCode, Json<Chapter>)> {
    let draft = payload.validate()?;
    let chapter = db::create_chapter(&state.db, &draft)
        .await
        .map_err(chapter_write_error)?;
    tracing::info!(
        "Created chapter {} of book {}",
        chapter.chapter_number,
        chapter.book_id
    );
    Ok((StatusCode::CREATED, Json(chapter)))
}

/// PUT /api/chapters/{id}
pub async fn update_chapter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<ChapterUpdate>,
) -> ApiResult<Json<Chapter>> {
    let update = payload.validate()?;
    let chapter = db::update_chapter(&state.db, id, &update)
        .await
        .map_err(chapter_write_error)?
        .ok_or_else(|| BackendError::not_found("Chapter not found"))?;
    Ok(Json(chapter))
}

/// DELETE /api/chapters/{id}
pub async fn delete_chapter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let pdf_path = db::delete_chapter(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Chapter not found"))?;

    if let Some(path) = pdf_path {
        state.pdfs.remove(&path).await;
    }
    Ok(Json(MessageResponse::new("Chapter deleted successfully")))
}

fn chapter_write_error(err: sqlx::Error) -> BackendError {
    match BackendError::from(err) {
        BackendError::Conflict(_) => {
            BackendError::conflict("Chapter number already exists for this book")
        }
        BackendError::NotFound(_) => BackendError::not_found("Book not found"),
        other => other,
    }
}
