//! Authentication data models.

use serde::{Deserialize, Serialize};

use crate::profile::PlayerId;

/// JWT claims for access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Profile ID of the caller
    pub sub: PlayerId,
    pub exp: i64,
    pub iat: i64,
}
