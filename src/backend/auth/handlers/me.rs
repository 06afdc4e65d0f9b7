/**
 * Get Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * the stored record of the currently authenticated user.
 *
 * # Authentication
 *
 * Runs behind `auth_middleware`, which already rejects tokens of deleted
 * accounts with 401. The full row is read here; an account removed between
 * the two reads yields 404.
 */

use axum::{extract::State, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::MeResponse;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::AuthUser;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - If the token is missing or invalid (middleware)
/// * `404 Not Found` - If the user was deleted after the middleware ran
pub async fn get_me(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> ApiResult<Json<MeResponse>> {
    let user = get_user_by_id(&pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for missing user {}", auth.user_id);
            BackendError::not_found("User not found")
        })?;

    Ok(Json(MeResponse { user: user.into() }))
}
