//! Authentication middleware for protected endpoints.
//!
//! Validates the identity provider's bearer token and injects the caller's
//! profile ID ([`PlayerId`]) into request extensions.
//!
//! # Extracting the caller
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use levelgg::PlayerId;
//!
//! async fn protected_handler(Extension(caller): Extension<PlayerId>) -> String {
//!     format!("Authenticated as {caller}")
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::{AppState, error::ApiError};
use crate::logging::log_security_event;

/// Reject requests without a valid `Authorization: Bearer <token>` header
/// with `401` and `{"error": "Authentication required"}`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match state.auth_manager.verify_bearer(header) {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            Ok(next.run(request).await)
        }
        Err(err) => {
            log_security_event("rejected_token", None, &err.to_string());
            Err(err.into())
        }
    }
}
