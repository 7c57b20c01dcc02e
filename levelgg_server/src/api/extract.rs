//! Extractors whose rejections use the JSON error body.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use levelgg::ErrorKind;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// [`Path`] that rejects malformed segments with `400` and `{"error": ...}`
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ApiPath(value))
            .map_err(|rejection| ApiError::new(ErrorKind::Validation, rejection.body_text()))
    }
}
