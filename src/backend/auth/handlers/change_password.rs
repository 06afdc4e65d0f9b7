//! Change password handler for PUT /api/auth/change-password

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{ChangePasswordRequest, MessageResponse};
use crate::backend::auth::password::{hash_password, verify_password};
use crate::backend::auth::users::{get_user_by_id, update_password_hash};
use crate::backend::extract::ApiJson;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

/// Change the caller's password
///
/// # Errors
///
/// * `400 Bad Request` - If either password is missing or empty
/// * `401 Unauthorized` - If the current password is wrong
/// * `404 Not Found` - If the user no longer exists
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let (current, new) = match (
        request.current_password.as_deref().filter(|p| !p.is_empty()),
        request.new_password.as_deref().filter(|p| !p.is_empty()),
    ) {
        (Some(current), Some(new)) => (current, new),
        _ => {
            return Err(BackendError::bad_request(
                "Current password and new password are required",
            ))
        }
    };

    let user = get_user_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    if !verify_password(current, &user.password_hash).await? {
        tracing::warn!("Password change rejected for {}", user.username);
        return Err(BackendError::InvalidCredentials);
    }

    let hash = hash_password(new, state.config.bcrypt_cost).await?;
    if !update_password_hash(&state.db, user.id, &hash).await? {
        return Err(BackendError::not_found("User not found"));
    }

    tracing::info!("Password changed for {}", user.username);
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
