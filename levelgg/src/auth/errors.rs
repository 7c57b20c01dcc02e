//! Authentication error types.

use thiserror::Error;

use crate::errors::ErrorKind;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token on the request
    #[error("Authentication required")]
    MissingToken,

    /// Token present but malformed, expired or wrongly signed
    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Authentication
    }

    /// Client-safe message that does not describe the token's defects
    pub fn client_message(&self) -> String {
        match self {
            AuthError::JwtError(_) => "Authentication required".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
