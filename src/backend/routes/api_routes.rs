/**
 * API Route Handlers
 *
 * This module wires the `/api` endpoints to their handlers and applies the
 * access layers.
 *
 * # Access Levels
 *
 * - **Public** - catalog reads, search, favorites and progress (device scoped)
 * - **Authenticated** - `/api/auth/verify`, `/api/auth/me`,
 *   `/api/auth/change-password`
 * - **Admin** - every catalog and upload mutation
 *
 * Protected groups are built as separate routers with `route_layer`, so the
 * layers only run for matched routes, then merged. A path may be served by
 * several groups with different methods (`GET /api/books` is public while
 * `POST /api/books` is admin only).
 */

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::auth::{change_password, get_me, login, logout, register, verify};
use crate::backend::catalog::handlers as catalog;
use crate::backend::engagement::handlers as engagement;
use crate::backend::middleware::{auth_middleware, require_admin};
use crate::backend::search::handlers as search;
use crate::backend::server::state::AppState;
use crate::backend::uploads::handlers as uploads;

/// Room for multipart boundaries and text fields on top of the file limit
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Require a valid session
fn authenticated(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Require a valid session with the admin role
fn admin_only(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Configure authentication routes
///
/// - `POST /api/auth/register` - First administrator (only while no users exist)
/// - `POST /api/auth/login` - Token in body and `token` cookie
/// - `POST /api/auth/logout` - Clears the cookie
/// - `GET /api/auth/verify` - Token check (authenticated)
/// - `GET /api/auth/me` - Current user (authenticated)
/// - `PUT /api/auth/change-password` - Password change (authenticated)
pub fn configure_auth_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/auth/verify", get(verify))
        .route("/api/auth/me", get(get_me))
        .route("/api/auth/change-password", put(change_password));

    router
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .merge(authenticated(protected, state))
}

/// Configure book and chapter routes
pub fn configure_catalog_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/api/books", post(catalog::create_book))
        .route(
            "/api/books/{id}",
            put(catalog::update_book).delete(catalog::delete_book),
        )
        .route("/api/chapters", post(catalog::create_chapter))
        .route(
            "/api/chapters/{id}",
            put(catalog::update_chapter).delete(catalog::delete_chapter),
        );

    router
        .route("/api/books", get(catalog::list_books))
        .route("/api/books/{id}", get(catalog::get_book))
        .route(
            "/api/books/category/{category}",
            get(catalog::list_books_by_category),
        )
        .route("/api/chapters/{id}", get(catalog::get_chapter))
        .route(
            "/api/chapters/book/{book_id}",
            get(catalog::list_book_chapters),
        )
        .merge(admin_only(admin, state))
}

/// Configure PDF upload routes
///
/// Upload routes raise the request body limit to the configured file limit
/// plus multipart overhead; the file size itself is enforced while
/// streaming.
pub fn configure_upload_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let book_limit = state.config.max_book_pdf_bytes + MULTIPART_OVERHEAD_BYTES;
    let chapter_limit = state.config.max_chapter_pdf_bytes + MULTIPART_OVERHEAD_BYTES;

    let book_uploads = Router::new()
        .route("/api/upload/pdf", post(uploads::upload_book_pdf))
        .layer(DefaultBodyLimit::max(book_limit));
    let chapter_uploads = Router::new()
        .route("/api/upload/chapter-pdf", post(uploads::upload_chapter_pdf))
        .layer(DefaultBodyLimit::max(chapter_limit));
    let admin = Router::new()
        .route("/api/upload/pdf/{book_id}", delete(uploads::delete_book_pdf))
        .route(
            "/api/upload/chapter-pdf/{chapter_id}",
            delete(uploads::delete_chapter_pdf),
        )
        .merge(book_uploads)
        .merge(chapter_uploads);

    router
        .route("/api/upload/pdf/{book_id}", get(uploads::get_book_pdf))
        .route(
            "/api/upload/chapter-pdf/{chapter_id}",
            get(uploads::get_chapter_pdf),
        )
        .merge(admin_only(admin, state))
}

/// Configure favorites and reading progress routes
///
/// The single-segment paths are shared: `GET` takes a device id while
/// `PUT`/`DELETE` take a row id.
pub fn configure_engagement_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/favorites", post(engagement::add_favorite))
        .route(
            "/api/favorites/{device_id}",
            get(engagement::list_favorites).delete(engagement::remove_favorite_by_id),
        )
        .route(
            "/api/favorites/{device_id}/{book_id}",
            get(engagement::favorite_status).delete(engagement::remove_favorite),
        )
        .route("/api/progress", post(engagement::upsert_progress))
        .route(
            "/api/progress/{device_id}",
            get(engagement::list_progress)
                .put(engagement::update_progress)
                .delete(engagement::delete_progress),
        )
        .route(
            "/api/progress/{device_id}/{book_id}",
            get(engagement::get_progress),
        )
        .route(
            "/api/progress/{device_id}/{book_id}/chapters/{chapter_number}",
            post(engagement::mark_chapter_read),
        )
}

/// Configure category and search routes
pub fn configure_search_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/categories", get(search::list_categories))
        .route("/api/search", get(search::search))
}
