/**
 * Login Handler
 *
 * This module implements the authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up the user by username or email
 * 2. Verify the password using bcrypt
 * 3. Generate a JWT token
 * 4. Return token and user info, and set the `token` cookie
 *
 * # Security
 *
 * - Unknown user and wrong password produce the identical 401 response
 * - Passwords are never logged or returned
 */

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Json},
};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::password::verify_password;
use crate::backend::auth::sessions::session_cookie;
use crate::backend::auth::users::get_user_by_login;
use crate::backend::extract::ApiJson;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::server::state::AppState;
use crate::shared::error::require_text;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - If username or password is missing
/// * `401 Unauthorized` - If the user is unknown or the password is wrong
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// { "username": "admin", "password": "admin123" }
/// ```
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let login = require_text("username", request.username.as_deref())?;
    let password = request
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| BackendError::bad_request("Username and password are required"))?;

    tracing::info!("Login request for: {}", login);

    let user = get_user_by_login(&state.db, login).await?.ok_or_else(|| {
        tracing::warn!("Login failed, unknown user: {}", login);
        BackendError::InvalidCredentials
    })?;

    if !verify_password(password, &user.password_hash).await? {
        tracing::warn!("Login failed, wrong password for: {}", login);
        return Err(BackendError::InvalidCredentials);
    }

    let token = state
        .sessions
        .create_token(&user)
        .map_err(|e| BackendError::internal(format!("Failed to create token: {:?}", e)))?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    let cookie = session_cookie(&token, state.config.production);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AuthResponse {
            message: "Login successful".to_string(),
            token,
            user: user.into(),
        }),
    ))
}
