/**
 * Register Handler
 *
 * POST /api/auth/register creates the first administrator. The endpoint is
 * open only while the users table is empty; once any account exists it
 * answers 403 and further accounts must be provisioned out of band.
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::{RegisterRequest, RegisterResponse};
use crate::backend::auth::password::hash_password;
use crate::backend::auth::users::{count_users, create_user, ADMIN_ROLE};
use crate::backend::extract::ApiJson;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::server::state::AppState;
use crate::shared::error::require_text;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - If a field is missing
/// * `403 Forbidden` - If any user already exists
/// * `409 Conflict` - If the username or email is taken
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let username = require_text("username", request.username.as_deref())?;
    let email = require_text("email", request.email.as_deref())?;
    let password = request
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| BackendError::bad_request("password is required"))?;

    if count_users(&state.db).await? > 0 {
        tracing::warn!("Registration attempt for {} after bootstrap", username);
        return Err(BackendError::forbidden("Registration is closed"));
    }

    let hash = hash_password(password, state.config.bcrypt_cost).await?;
    let user = create_user(&state.db, username, email, &hash, ADMIN_ROLE)
        .await
        .map_err(|e| match BackendError::from(e) {
            BackendError::Conflict(_) => BackendError::conflict("Username or email already exists"),
            other => other,
        })?;

    tracing::info!("Administrator {} registered", user.username);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Admin user created successfully".to_string(),
            user: user.into(),
        }),
    ))
}
