//! Logout handler for POST /api/auth/logout
//!
//! Tokens are stateless, so logging out only clears the browser cookie.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Json},
};
use std::sync::Arc;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::auth::sessions::clear_session_cookie;
use crate::shared::AppConfig;

pub async fn logout(State(config): State<Arc<AppConfig>>) -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie(config.production))]),
        Json(MessageResponse::new("Logout successful")),
    )
}
