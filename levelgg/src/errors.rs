//! Error classification shared by every manager.
//!
//! Each module keeps its own `thiserror` enum, but all of them fold into the
//! same five categories so the HTTP layer can pick a status code without
//! knowing about individual variants.

use serde::Serialize;

/// Broad category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No identity was presented, or it could not be verified.
    Authentication,
    /// The caller is known but not allowed to perform the operation.
    Authorization,
    /// A referenced tournament, team, membership or registration is missing.
    NotFound,
    /// Bad input or a violated precondition (capacity, duplicates, state).
    Validation,
    /// The backing store reported an error.
    Store,
}

impl ErrorKind {
    /// HTTP status code conventionally associated with this category.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Authentication => 401,
            ErrorKind::Authorization => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Validation => 400,
            ErrorKind::Store => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::Authentication.status_code(), 401);
        assert_eq!(ErrorKind::Authorization.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Validation.status_code(), 400);
        assert_eq!(ErrorKind::Store.status_code(), 500);
    }
}
