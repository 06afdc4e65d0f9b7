//! Token check handler for GET /api/auth/verify
//!
//! Runs behind `auth_middleware`; reaching the handler means the token is
//! valid and its user exists, so the answer is the user the middleware
//! loaded.

use axum::response::Json;

use crate::backend::auth::handlers::types::VerifyResponse;
use crate::backend::middleware::AuthUser;

pub async fn verify(AuthUser(user): AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        is_authenticated: true,
        user: user.into(),
    })
}
