//! JSON error responses.
//!
//! Every failure leaves the server as `{"error": "<message>"}` with the status
//! code of the error's [`ErrorKind`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use levelgg::{
    ErrorKind, auth::AuthError, draft::DraftError, registration::RegistrationError,
    team::TeamError, tournament::TournamentError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(kind.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.kind(), err.client_message())
    }
}

macro_rules! impl_from_domain_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for ApiError {
                fn from(err: $error) -> Self {
                    Self::new(err.kind(), err.to_string())
                }
            }
        )*
    };
}

impl_from_domain_error!(DraftError, RegistrationError, TeamError, TournamentError);
