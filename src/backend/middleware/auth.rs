/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * authentication. `auth_middleware` verifies the session token and attaches
 * the caller to the request; `require_admin` additionally insists on the
 * `admin` role.
 *
 * Layer order matters: `require_admin` reads what `auth_middleware` inserted,
 * so it must run after it (added first with `route_layer`).
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

use crate::backend::auth::sessions::{token_from_headers, SessionKeys};
use crate::backend::auth::users::{get_user_by_id, User, ADMIN_ROLE};
use crate::backend::error::BackendError;

/// Authenticated user data extracted from the session token
#[derive(Clone, Debug, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl AuthenticatedUser {
    fn from_user(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the token from the `Authorization` header or `token` cookie
/// 2. Verifies signature and expiry
/// 3. Loads the user the token names, so deleted accounts lose access and
///    role changes apply immediately
/// 4. Attaches an `AuthenticatedUser` to the request extensions
///
/// Returns 401 Unauthorized if the token is missing, malformed or expired,
/// or if its user no longer exists.
pub async fn auth_middleware(
    State(sessions): State<SessionKeys>,
    State(pool): State<SqlitePool>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = token_from_headers(request.headers()).ok_or_else(|| {
        tracing::warn!("Missing session token");
        BackendError::unauthorized("Access denied. No token provided.")
    })?;

    let claims = sessions.verify_token(&token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Invalid token")
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("Token subject is not a user id: {}", claims.sub);
        BackendError::unauthorized("Invalid token")
    })?;

    let user = verify_user_exists(&pool, user_id).await?;
    request.extensions_mut().insert(AuthenticatedUser::from_user(user));

    Ok(next.run(request).await)
}

/// Load the user a token was issued to
async fn verify_user_exists(pool: &SqlitePool, user_id: i64) -> Result<User, BackendError> {
    get_user_by_id(pool, user_id).await?.ok_or_else(|| {
        tracing::warn!("Token for deleted user {}", user_id);
        BackendError::unauthorized("User no longer exists")
    })
}

/// Admin gate
///
/// Must be layered inside `auth_middleware`. Returns 403 Forbidden when the
/// caller is authenticated without the admin role.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, BackendError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| BackendError::unauthorized("Authentication required"))?;

    if !user.is_admin() {
        tracing::warn!("User {} ({}) denied admin access", user.username, user.role);
        return Err(BackendError::forbidden("Access denied. Admin privileges required."));
    }

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Use as a handler parameter on routes behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Authentication required")
            })?;

        Ok(AuthUser(user))
    }
}
