//! Access token verification.
//!
//! Sessions are owned by the identity provider; this side only checks the
//! HS256 bearer token it hands out and reads the caller's profile ID from `sub`.

use super::{
    errors::{AuthError, AuthResult},
    models::AccessTokenClaims,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::profile::PlayerId;

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    jwt_secret: String,
    access_token_duration: Duration,
}

impl AuthManager {
    /// Create a new authentication manager signing with `jwt_secret`
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            access_token_duration: Duration::hours(1),
        }
    }

    /// Override how long issued tokens stay valid
    pub fn with_token_duration(mut self, duration: Duration) -> Self {
        self.access_token_duration = duration;
        self
    }

    /// Issue an access token for `player_id`
    pub fn issue_access_token(&self, player_id: PlayerId) -> AuthResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: player_id,
            exp: (now + self.access_token_duration).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify access token
    ///
    /// # Errors
    ///
    /// * `AuthError::JwtError` - Bad signature, malformed token or expired
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Verify a raw `Authorization` header value of the form `Bearer <token>`
    pub fn verify_bearer(&self, header: Option<&str>) -> AuthResult<PlayerId> {
        let token = header
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingToken)?;
        Ok(self.verify_access_token(token)?.sub)
    }
}
