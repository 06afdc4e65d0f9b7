//! Request extractors
//!
//! `ApiJson` wraps `axum::Json` so a malformed or missing JSON body is
//! reported in the API's own error format (400) rather than axum's plain
//! text rejection.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::backend::error::BackendError;

/// JSON body extractor with API-formatted rejections
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::warn!("Rejected JSON body: {}", rejection.body_text());
                Err(BackendError::bad_request(rejection.body_text()))
            }
        }
    }
}
